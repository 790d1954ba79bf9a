//! Трекер видимости наблюдаемого региона в окне просмотра.
//!
//! Работает как waypoint-хук: хост привязывает дескриптор к отрисованному
//! региону и получает живое булево состояние, которое меняется при входе
//! региона в окно просмотра и выходе из него. При наличии нативного
//! примитива наблюдения пересечений используется он; иначе - резервный
//! опрос позиции по событиям прокрутки. При скрытии/показе страницы хоста
//! трекер перевзводится.
//!
//! Окружение абстрагировано трейтом [`Platform`]: ядро не трогает глобалей
//! браузера и тестируется на [`ScriptedPlatform`]. Адаптер хост-фреймворка
//! вызывает [`VisibilityTracker::start`] при монтировании и
//! [`VisibilityTracker::stop`] при размонтировании, ровно по одному разу.
//!
//! # Пример
//!
//! ```no_run
//! use std::sync::Arc;
//! use offscreen_tracker::{track, RegionId, ScriptedPlatform, TrackerConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let platform = Arc::new(ScriptedPlatform::new());
//!     let config = TrackerConfig::default().with_debounce_ms(150);
//!     let (region, mut offscreen, tracker) = track(platform.clone(), config);
//!
//!     // Хост привязывает дескриптор к конкретному региону при отрисовке
//!     region.bind(RegionId::new(1)).unwrap();
//!     tracker.start().unwrap();
//!
//!     // Дать задаче стратегии подписаться на сигналы платформы
//!     tokio::task::yield_now().await;
//!
//!     // Окружение сообщает, что регион пересёк окно просмотра
//!     platform.emit_intersection(RegionId::new(1), true);
//!
//!     offscreen.changed().await.unwrap();
//!     println!(
//!         "{}",
//!         if *offscreen.borrow() { "not visible" } else { "visible" }
//!     );
//!
//!     tracker.stop();
//! }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod platform;
pub mod services;

pub use config::TrackerConfig;
pub use error::{Result, TrackerError};
pub use events::{IntersectionEvent, PageEvent, PageEventKind, RegionHandle, RegionId};
pub use platform::{Platform, ScriptedPlatform};
pub use services::{track, StrategyKind, VisibilityTracker};
