use crate::config::TrackerConfig;
use crate::events::RegionId;
use crate::platform::Platform;
use crate::services::emitter::DebouncedEmitter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use super::r#trait::ObservationStrategy;

/// Поле вокруг окна просмотра для примитива пересечений (px, все стороны)
pub(crate) const OBSERVER_MARGIN_PX: f64 = 10.0;

/// Стратегия на нативном примитиве наблюдения пересечений
pub(crate) struct ObserverStrategy {
    platform: Arc<dyn Platform>,
    region: RegionId,
    once: bool,
    emitter: Arc<DebouncedEmitter>,
    observing: Arc<AtomicBool>,
}

impl ObserverStrategy {
    pub(crate) fn new(
        platform: Arc<dyn Platform>,
        region: RegionId,
        config: TrackerConfig,
        emitter: Arc<DebouncedEmitter>,
    ) -> Self {
        Self {
            platform,
            region,
            once: config.once,
            emitter,
            observing: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait::async_trait]
impl ObservationStrategy for ObserverStrategy {
    fn observation_flag(&self) -> Option<Arc<AtomicBool>> {
        Some(Arc::clone(&self.observing))
    }

    async fn run(self: Box<Self>) {
        let mut signals = self.platform.observe(self.region, OBSERVER_MARGIN_PX);
        self.observing.store(true, Ordering::SeqCst);
        debug!("Наблюдение пересечений для {} подключено", self.region);

        loop {
            match signals.recv().await {
                Ok(signal) => {
                    // Скрытая страница перекрывает геометрию: любой сигнал
                    // в этом состоянии трактуется как offscreen. Once при
                    // этом не расходуется.
                    if self.platform.page_hidden() {
                        self.emitter.request(true);
                        continue;
                    }

                    if signal.is_intersecting {
                        if self.once {
                            if self.observing.swap(false, Ordering::SeqCst) {
                                self.platform.unobserve(self.region);
                            }
                            self.emitter.request(false);
                            debug!("Регион {} виден, once-режим: наблюдение снято", self.region);
                            break;
                        }
                        self.emitter.request(false);
                    } else {
                        self.emitter.request(true);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Пропущено {} сигналов пересечения для {}", skipped, self.region);
                    continue;
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ScriptedPlatform;
    use crate::services::tracker::track;
    use tokio::time::{sleep, Duration};

    // Дать задачам стратегии и публикатора обработать эмитированные события
    async fn drain() {
        sleep(Duration::from_millis(1)).await;
    }

    fn observer_setup(
        config: TrackerConfig,
    ) -> (
        Arc<ScriptedPlatform>,
        RegionId,
        tokio::sync::watch::Receiver<bool>,
        crate::services::tracker::VisibilityTracker,
    ) {
        let platform = Arc::new(ScriptedPlatform::new());
        let region = RegionId::new(1);
        let (handle, state, tracker) = track(platform.clone(), config);
        handle.bind(region).unwrap();
        (platform, region, state, tracker)
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_and_leave_signals_toggle_state() {
        let (platform, region, state, tracker) = observer_setup(TrackerConfig::default());
        tracker.start().unwrap();
        drain().await;

        assert!(platform.is_observed(region));
        assert_eq!(platform.observed_margin(region), Some(OBSERVER_MARGIN_PX));

        assert!(platform.emit_intersection(region, true));
        drain().await;
        assert!(!*state.borrow());

        assert!(platform.emit_intersection(region, false));
        drain().await;
        assert!(*state.borrow());

        tracker.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_once_detaches_after_first_visible_signal() {
        let (platform, region, mut state, tracker) =
            observer_setup(TrackerConfig::default().with_once(true));
        tracker.start().unwrap();
        drain().await;

        assert!(platform.emit_intersection(region, true));
        drain().await;
        assert!(!*state.borrow_and_update());
        assert!(!platform.is_observed(region));
        assert_eq!(platform.unobserve_count(region), 1);

        // Дальнейшие сигналы никому не доставляются и ничего не публикуют
        assert!(!platform.emit_intersection(region, false));
        assert!(!platform.emit_intersection(region, true));
        drain().await;
        assert!(!state.has_changed().unwrap());

        tracker.stop();
        // Отключение не пытается снять наблюдение повторно
        assert_eq!(platform.unobserve_count(region), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hidden_page_overrides_intersection_geometry() {
        let (platform, region, state, tracker) =
            observer_setup(TrackerConfig::default().with_once(true));
        tracker.start().unwrap();
        drain().await;

        platform.set_page_hidden(true);
        assert!(platform.emit_intersection(region, true));
        drain().await;
        assert!(*state.borrow());
        // Once на скрытой странице не израсходован
        assert!(platform.is_observed(region));

        platform.set_page_hidden(false);
        assert!(platform.emit_intersection(region, true));
        drain().await;
        assert!(!*state.borrow());
        assert!(!platform.is_observed(region));

        tracker.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_intersecting_signal_reports_offscreen() {
        let (platform, region, mut state, tracker) = observer_setup(TrackerConfig::default());
        tracker.start().unwrap();
        drain().await;

        // Состояние уже true; сигнал "не пересекается" публикует true повторно
        state.borrow_and_update();
        assert!(platform.emit_intersection(region, false));
        drain().await;
        assert!(state.has_changed().unwrap());
        assert!(*state.borrow());

        tracker.stop();
    }
}
