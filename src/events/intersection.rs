use crate::events::RegionId;
use std::fmt;

/// Сигнал пересечения региона с окном просмотра
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionEvent {
    pub region: RegionId,
    pub is_intersecting: bool,
    pub timestamp: std::time::Instant,
}

impl IntersectionEvent {
    pub fn new(region: RegionId, is_intersecting: bool) -> Self {
        Self {
            region,
            is_intersecting,
            timestamp: std::time::Instant::now(),
        }
    }

    /// Регион вошёл в окно просмотра
    pub fn entered(region: RegionId) -> Self {
        Self::new(region, true)
    }

    /// Регион покинул окно просмотра
    pub fn left(region: RegionId) -> Self {
        Self::new(region, false)
    }
}

impl fmt::Display for IntersectionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}ms ago)",
            self.region,
            if self.is_intersecting {
                "intersecting"
            } else {
                "not intersecting"
            },
            self.timestamp.elapsed().as_millis()
        )
    }
}
