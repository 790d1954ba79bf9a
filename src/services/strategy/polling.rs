use crate::config::TrackerConfig;
use crate::events::RegionId;
use crate::platform::Platform;
use crate::services::emitter::DebouncedEmitter;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{Duration, Instant};
use tracing::debug;

use super::r#trait::ObservationStrategy;

/// Запас по нижней границе окна просмотра (px); по верхней границе запаса нет
pub(crate) const VISIBLE_SLACK_PX: f64 = 75.0;

/// Минимальный интервал между принятыми оценками по прокрутке
pub(crate) const SCROLL_THROTTLE: Duration = Duration::from_millis(500);

enum Control {
    Continue,
    Detach,
}

/// Резервная стратегия: опрос верхней координаты региона по событиям прокрутки.
///
/// Переход "стал видимым" гейтится значением опубликованного состояния,
/// захваченным при запуске трекера; переход "стал скрытым" - отдельным
/// локальным флагом. Это два намеренно разных гейта, а не одна переменная.
pub(crate) struct PollingStrategy {
    platform: Arc<dyn Platform>,
    region: RegionId,
    once: bool,
    emitter: Arc<DebouncedEmitter>,
    installed_offscreen: bool,
}

impl PollingStrategy {
    pub(crate) fn new(
        platform: Arc<dyn Platform>,
        region: RegionId,
        config: TrackerConfig,
        emitter: Arc<DebouncedEmitter>,
        installed_offscreen: bool,
    ) -> Self {
        Self {
            platform,
            region,
            once: config.once,
            emitter,
            installed_offscreen,
        }
    }

    /// Одна оценка видимости региона
    fn evaluate(&self, local_offscreen: &mut bool) -> Control {
        if self.platform.page_hidden() {
            // Локальные флаги на скрытой странице не трогаем
            self.emitter.request(true);
            return Control::Continue;
        }

        let Some(top) = self.platform.region_top(self.region) else {
            return Control::Continue;
        };
        let viewport = self.platform.viewport_height();

        let visible = top >= 0.0 && top < viewport + VISIBLE_SLACK_PX;

        if visible {
            if self.installed_offscreen {
                *local_offscreen = false;
                if self.once {
                    debug!(
                        "Регион {} виден, once-режим: слушатель прокрутки снят",
                        self.region
                    );
                    self.emitter.request(false);
                    return Control::Detach;
                }
                self.emitter.request(false);
            }
        } else if !*local_offscreen {
            *local_offscreen = true;
            self.emitter.request(true);
        }

        Control::Continue
    }
}

#[async_trait::async_trait]
impl ObservationStrategy for PollingStrategy {
    fn observation_flag(&self) -> Option<Arc<AtomicBool>> {
        None
    }

    async fn run(self: Box<Self>) {
        let mut scrolls = self.platform.subscribe_scroll();
        debug!("Опрос позиции для {} подключен", self.region);

        let mut local_offscreen = false;
        let mut last_accepted: Option<Instant> = None;

        // Немедленная оценка при привязке; дроссель при этом не взводится
        if let Control::Detach = self.evaluate(&mut local_offscreen) {
            return;
        }

        loop {
            match scrolls.recv().await {
                Ok(_) => {
                    // Дроссель: не чаще одной принятой оценки в SCROLL_THROTTLE;
                    // часы обновляются только при принятии
                    if last_accepted.map_or(false, |t| t.elapsed() <= SCROLL_THROTTLE) {
                        continue;
                    }
                    last_accepted = Some(Instant::now());

                    if let Control::Detach = self.evaluate(&mut local_offscreen) {
                        break;
                    }
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    }
}
