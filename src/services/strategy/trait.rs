use crate::config::TrackerConfig;
use crate::events::RegionId;
use crate::platform::Platform;
use crate::services::emitter::DebouncedEmitter;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::observer::ObserverStrategy;
use super::polling::PollingStrategy;

/// Вид стратегии наблюдения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Нативный примитив наблюдения пересечений
    ObserverBased,
    /// Ручной опрос позиции по событиям прокрутки
    PollingBased,
}

/// Trait for observation strategies that feed the debounced emitter
#[async_trait::async_trait]
pub(crate) trait ObservationStrategy: Send {
    /// Flag raised while a platform-level observation is attached.
    ///
    /// The tracker clears it when detaching so the region is never
    /// unobserved twice; `None` for strategies with no platform-level state.
    fn observation_flag(&self) -> Option<Arc<AtomicBool>>;

    /// Consume signals until detached (or until `once` fires)
    async fn run(self: Box<Self>);
}

/// Выбор стратегии: чистая проверка возможностей окружения, без побочных
/// эффектов; переоценивается при каждой (пере)привязке
pub(crate) fn select_strategy(platform: &dyn Platform) -> StrategyKind {
    if platform.has_intersection_observer() {
        StrategyKind::ObserverBased
    } else {
        StrategyKind::PollingBased
    }
}

/// Factory function to create a strategy of the selected kind
pub(crate) fn create_strategy(
    kind: StrategyKind,
    platform: Arc<dyn Platform>,
    region: RegionId,
    config: TrackerConfig,
    emitter: Arc<DebouncedEmitter>,
    installed_offscreen: bool,
) -> Box<dyn ObservationStrategy + Send> {
    match kind {
        StrategyKind::ObserverBased => {
            Box::new(ObserverStrategy::new(platform, region, config, emitter))
        }
        StrategyKind::PollingBased => Box::new(PollingStrategy::new(
            platform,
            region,
            config,
            emitter,
            installed_offscreen,
        )),
    }
}
