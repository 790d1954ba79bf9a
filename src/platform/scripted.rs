use crate::events::{IntersectionEvent, PageEvent, RegionId};
use crate::platform::Platform;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 64;

struct Observation {
    tx: broadcast::Sender<IntersectionEvent>,
    margin_px: f64,
}

/// Сценарная платформа: полностью управляемая реализация [`Platform`].
///
/// Используется в тестах и для экспериментов на стороне хоста: окружение
/// (наличие примитива пересечений, скрытость страницы, геометрия) задаётся
/// явно, а события прокрутки/пересечения/видимости эмитятся вручную.
pub struct ScriptedPlatform {
    intersection_observer: AtomicBool,
    page_hidden: AtomicBool,
    viewport_height: RwLock<f64>,
    region_tops: RwLock<HashMap<RegionId, f64>>,
    // Учёт наблюдений для проверки инварианта "ноль или один активный механизм"
    observations: Mutex<HashMap<RegionId, Observation>>,
    unobserved: Mutex<Vec<RegionId>>,
    scroll_tx: broadcast::Sender<PageEvent>,
    visibility_tx: broadcast::Sender<PageEvent>,
}

impl ScriptedPlatform {
    pub fn new() -> Self {
        let (scroll_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (visibility_tx, _) = broadcast::channel(CHANNEL_CAPACITY);

        Self {
            intersection_observer: AtomicBool::new(true),
            page_hidden: AtomicBool::new(false),
            viewport_height: RwLock::new(600.0),
            region_tops: RwLock::new(HashMap::new()),
            observations: Mutex::new(HashMap::new()),
            unobserved: Mutex::new(Vec::new()),
            scroll_tx,
            visibility_tx,
        }
    }

    pub fn with_intersection_observer(self, available: bool) -> Self {
        self.intersection_observer.store(available, Ordering::SeqCst);
        self
    }

    pub fn set_intersection_observer(&self, available: bool) {
        self.intersection_observer.store(available, Ordering::SeqCst);
    }

    pub fn set_page_hidden(&self, hidden: bool) {
        self.page_hidden.store(hidden, Ordering::SeqCst);
    }

    pub fn set_viewport_height(&self, height: f64) {
        *self.viewport_height.write() = height;
    }

    pub fn set_region_top(&self, region: RegionId, top: f64) {
        self.region_tops.write().insert(region, top);
    }

    /// Эмитировать событие прокрутки страницы
    pub fn emit_scroll(&self) {
        // Отсутствие подписчиков не является ошибкой сценария
        let _ = self.scroll_tx.send(PageEvent::scrolled());
    }

    /// Эмитировать событие смены видимости страницы
    pub fn emit_visibility_change(&self) {
        let _ = self.visibility_tx.send(PageEvent::visibility_changed());
    }

    /// Эмитировать сигнал пересечения для региона.
    ///
    /// Возвращает `false`, если регион в данный момент не наблюдается
    /// (сигнал никому не доставлен).
    pub fn emit_intersection(&self, region: RegionId, is_intersecting: bool) -> bool {
        let observations = self.observations.lock();
        match observations.get(&region) {
            Some(observation) => observation
                .tx
                .send(IntersectionEvent::new(region, is_intersecting))
                .is_ok(),
            None => false,
        }
    }

    pub fn is_observed(&self, region: RegionId) -> bool {
        self.observations.lock().contains_key(&region)
    }

    pub fn observed_margin(&self, region: RegionId) -> Option<f64> {
        self.observations.lock().get(&region).map(|o| o.margin_px)
    }

    /// Сколько раз платформу просили прекратить наблюдение региона
    pub fn unobserve_count(&self, region: RegionId) -> usize {
        self.unobserved.lock().iter().filter(|r| **r == region).count()
    }

    /// Число активных подписок на прокрутку
    pub fn scroll_listener_count(&self) -> usize {
        self.scroll_tx.receiver_count()
    }

    /// Число активных подписок на смену видимости страницы
    pub fn visibility_listener_count(&self) -> usize {
        self.visibility_tx.receiver_count()
    }
}

impl Default for ScriptedPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for ScriptedPlatform {
    fn has_intersection_observer(&self) -> bool {
        self.intersection_observer.load(Ordering::SeqCst)
    }

    fn page_hidden(&self) -> bool {
        self.page_hidden.load(Ordering::SeqCst)
    }

    fn viewport_height(&self) -> f64 {
        *self.viewport_height.read()
    }

    fn region_top(&self, region: RegionId) -> Option<f64> {
        self.region_tops.read().get(&region).copied()
    }

    fn observe(&self, region: RegionId, margin_px: f64) -> broadcast::Receiver<IntersectionEvent> {
        debug!("Сценарий: начато наблюдение {} (поле {}px)", region, margin_px);

        let mut observations = self.observations.lock();
        let observation = observations.entry(region).or_insert_with(|| {
            let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
            Observation { tx, margin_px }
        });
        observation.margin_px = margin_px;
        observation.tx.subscribe()
    }

    fn unobserve(&self, region: RegionId) {
        debug!("Сценарий: наблюдение {} прекращено", region);

        self.observations.lock().remove(&region);
        self.unobserved.lock().push(region);
    }

    fn subscribe_scroll(&self) -> broadcast::Receiver<PageEvent> {
        self.scroll_tx.subscribe()
    }

    fn subscribe_page_visibility(&self) -> broadcast::Receiver<PageEvent> {
        self.visibility_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_bookkeeping() {
        let platform = ScriptedPlatform::new();
        let region = RegionId::new(1);

        assert!(!platform.is_observed(region));
        assert!(!platform.emit_intersection(region, true));

        let _rx = platform.observe(region, 10.0);
        assert!(platform.is_observed(region));
        assert_eq!(platform.observed_margin(region), Some(10.0));
        assert!(platform.emit_intersection(region, true));

        platform.unobserve(region);
        assert!(!platform.is_observed(region));
        assert_eq!(platform.unobserve_count(region), 1);
    }

    #[test]
    fn test_listener_counts_follow_receiver_drops() {
        let platform = ScriptedPlatform::new();
        assert_eq!(platform.scroll_listener_count(), 0);

        let rx = platform.subscribe_scroll();
        assert_eq!(platform.scroll_listener_count(), 1);

        drop(rx);
        assert_eq!(platform.scroll_listener_count(), 0);
    }

    #[test]
    fn test_geometry_accessors() {
        let platform = ScriptedPlatform::new();
        let region = RegionId::new(2);

        assert_eq!(platform.region_top(region), None);

        platform.set_region_top(region, -40.0);
        platform.set_viewport_height(800.0);
        assert_eq!(platform.region_top(region), Some(-40.0));
        assert_eq!(platform.viewport_height(), 800.0);
    }
}
