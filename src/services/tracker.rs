use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::events::{PageEventKind, RegionHandle, RegionId};
use crate::platform::Platform;
use crate::services::emitter::DebouncedEmitter;
use crate::services::strategy::{
    create_strategy, select_strategy, ObservationStrategy, StrategyKind,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Подключённая стратегия и всё необходимое для её отключения
struct AttachedStrategy {
    kind: StrategyKind,
    region: RegionId,
    task: JoinHandle<()>,
    observation_flag: Option<Arc<AtomicBool>>,
}

struct TrackerInner {
    platform: Arc<dyn Platform>,
    region: RegionHandle,
    config: TrackerConfig,
    emitter: Arc<DebouncedEmitter>,
    state: watch::Receiver<bool>,
    // Инвариант: ноль или один активный механизм наблюдения
    active: Mutex<Option<AttachedStrategy>>,
    rearm: Mutex<Option<JoinHandle<()>>>,
    // Гейт "стал видимым" для опроса: снимок опубликованного состояния,
    // захваченный в start() и не обновляемый до следующего start()
    installed_offscreen: AtomicBool,
    started: AtomicBool,
}

impl TrackerInner {
    /// Выбрать стратегию и подключить её к региону.
    ///
    /// Без привязанного региона цикл наблюдения пропускается: выбор стратегии
    /// уже состоялся, но ни одна стратегия ничего не подключает.
    fn attach(&self) {
        let kind = select_strategy(self.platform.as_ref());
        debug!("Выбрана стратегия наблюдения: {:?}", kind);

        let Some(region) = self.region.get() else {
            debug!("Регион не привязан - стратегия не подключена в этом цикле");
            return;
        };

        let strategy: Box<dyn ObservationStrategy + Send> = create_strategy(
            kind,
            Arc::clone(&self.platform),
            region,
            self.config,
            Arc::clone(&self.emitter),
            self.installed_offscreen.load(Ordering::SeqCst),
        );
        let observation_flag = strategy.observation_flag();
        let task = tokio::spawn(strategy.run());

        *self.active.lock() = Some(AttachedStrategy {
            kind,
            region,
            task,
            observation_flag,
        });
    }

    /// Отключить активную стратегию, если она есть.
    ///
    /// Прерывание задачи синхронно останавливает обработку дальнейших
    /// сигналов; наблюдение на платформе снимается только если стратегия
    /// ещё не сняла его сама (once-путь).
    fn detach(&self) {
        if let Some(active) = self.active.lock().take() {
            active.task.abort();
            if let Some(flag) = active.observation_flag {
                if flag.swap(false, Ordering::SeqCst) {
                    self.platform.unobserve(active.region);
                }
            }
            debug!("Стратегия {:?} отключена", active.kind);
        }
    }

    /// Единственная точка повторного входа после первичной привязки:
    /// на каждом переходе hidden <-> visible текущая стратегия снимается,
    /// затем либо публикуется offscreen = true (страница скрыта), либо
    /// выбор стратегии выполняется заново. Повторная привязка не сверяется
    /// с тем, сработал ли уже once.
    async fn rearm_loop(inner: Arc<Self>) {
        let mut events = inner.platform.subscribe_page_visibility();

        loop {
            match events.recv().await {
                Ok(event) => {
                    if event.kind != PageEventKind::VisibilityChanged {
                        continue;
                    }

                    inner.detach();
                    if inner.platform.page_hidden() {
                        debug!("Страница скрыта - публикуем offscreen = true");
                        inner.emitter.request(true);
                    } else {
                        debug!("Страница снова видима - повторный выбор стратегии");
                        inner.attach();
                    }
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    }
}

/// Трекер видимости одного наблюдаемого региона.
///
/// Жизненный цикл принадлежит хосту: адаптер хост-фреймворка вызывает
/// [`start()`](Self::start) при монтировании и [`stop()`](Self::stop) при
/// размонтировании, ровно по одному разу.
pub struct VisibilityTracker {
    inner: Arc<TrackerInner>,
}

impl VisibilityTracker {
    pub fn new(platform: Arc<dyn Platform>, config: TrackerConfig) -> Self {
        let (emitter, state) = DebouncedEmitter::new(config.debounce());

        Self {
            inner: Arc::new(TrackerInner {
                platform,
                region: RegionHandle::unbound(),
                config,
                emitter: Arc::new(emitter),
                state,
                active: Mutex::new(None),
                rearm: Mutex::new(None),
                installed_offscreen: AtomicBool::new(true),
                started: AtomicBool::new(false),
            }),
        }
    }

    /// Дескриптор региона для привязки хостом
    pub fn region(&self) -> RegionHandle {
        self.inner.region.clone()
    }

    /// Живое опубликованное состояние (`true` = регион вне окна просмотра)
    pub fn offscreen(&self) -> watch::Receiver<bool> {
        self.inner.state.clone()
    }

    /// Текущее опубликованное состояние
    pub fn is_offscreen(&self) -> bool {
        *self.inner.state.borrow()
    }

    pub fn config(&self) -> TrackerConfig {
        self.inner.config
    }

    /// Вид активной стратегии, если какая-то подключена
    pub fn active_strategy(&self) -> Option<StrategyKind> {
        self.inner.active.lock().as_ref().map(|a| a.kind)
    }

    /// Монтирование: захватить гейт видимости, подключить стратегию,
    /// установить слушатель смены видимости страницы
    pub fn start(&self) -> Result<()> {
        if self.inner.started.swap(true, Ordering::SeqCst) {
            return Err(TrackerError::AlreadyStarted);
        }

        info!(
            "Запуск трекера видимости (once: {}, debounce: {}мс)",
            self.inner.config.once, self.inner.config.debounce_ms
        );

        self.inner
            .installed_offscreen
            .store(*self.inner.state.borrow(), Ordering::SeqCst);

        self.inner.attach();

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(TrackerInner::rearm_loop(inner));
        *self.inner.rearm.lock() = Some(handle);

        Ok(())
    }

    /// Размонтирование: снять слушатель видимости страницы, отключить
    /// стратегию, отменить отложенный таймер публикации. Идемпотентно.
    pub fn stop(&self) {
        if !self.inner.started.swap(false, Ordering::SeqCst) {
            return;
        }

        if let Some(handle) = self.inner.rearm.lock().take() {
            handle.abort();
        }
        self.inner.detach();
        self.inner.emitter.cancel();

        info!("Трекер видимости остановлен");
    }
}

/// Создать трекер и вернуть его публичный контракт: дескриптор региона,
/// живое состояние offscreen (изначально `true`) и сам трекер для
/// управления жизненным циклом
pub fn track(
    platform: Arc<dyn Platform>,
    config: TrackerConfig,
) -> (RegionHandle, watch::Receiver<bool>, VisibilityTracker) {
    let tracker = VisibilityTracker::new(platform, config);
    (tracker.region(), tracker.offscreen(), tracker)
}
