use serde::{Deserialize, Serialize};
use tokio::time::Duration;

/// Конфигурация трекера видимости.
///
/// Неизменяема на протяжении жизни трекера: `once` и `debounce_ms`
/// фиксируются в момент создания.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TrackerConfig {
    /// Прекратить наблюдение после первого попадания региона в окно просмотра
    #[serde(default)]
    pub once: bool,

    /// Задержка публикации состояния в миллисекундах (0 = публикация на следующем тике)
    #[serde(default)]
    pub debounce_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            once: false,
            debounce_ms: 0,
        }
    }
}

impl TrackerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Интервал debounce как `Duration`
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
