use std::fmt;

/// Тип события страницы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageEventKind {
    /// Страница прокручена
    Scrolled,
    /// Страница сменила состояние видимости (hidden <-> visible)
    VisibilityChanged,
}

/// Событие уровня страницы, рассылаемое платформой
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEvent {
    pub kind: PageEventKind,
    pub timestamp: std::time::Instant,
}

impl PageEvent {
    pub fn new(kind: PageEventKind) -> Self {
        Self {
            kind,
            timestamp: std::time::Instant::now(),
        }
    }

    pub fn scrolled() -> Self {
        Self::new(PageEventKind::Scrolled)
    }

    pub fn visibility_changed() -> Self {
        Self::new(PageEventKind::VisibilityChanged)
    }
}

impl fmt::Display for PageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} ({}ms ago)",
            self.kind,
            self.timestamp.elapsed().as_millis()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_event_constructors() {
        assert_eq!(PageEvent::scrolled().kind, PageEventKind::Scrolled);
        assert_eq!(
            PageEvent::visibility_changed().kind,
            PageEventKind::VisibilityChanged
        );
    }
}
