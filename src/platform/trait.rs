use crate::events::{IntersectionEvent, PageEvent, RegionId};
use tokio::sync::broadcast;

/// Capability interface of the execution environment.
///
/// The tracker never touches environment globals directly: everything it
/// needs (the intersection primitive, the page-hidden flag, viewport
/// geometry, scroll and page-visibility event sources) is supplied by an
/// implementation of this trait. Dropping a returned receiver removes the
/// corresponding listener.
pub trait Platform: Send + Sync + 'static {
    /// Доступен ли нативный примитив наблюдения пересечений.
    ///
    /// Единственная проверка окружения перед выбором стратегии; побочных
    /// эффектов не имеет и переоценивается при каждой (пере)привязке.
    fn has_intersection_observer(&self) -> bool;

    /// Скрыта ли страница хоста в данный момент
    fn page_hidden(&self) -> bool;

    /// Высота окна просмотра в пикселях
    fn viewport_height(&self) -> f64;

    /// Верхняя координата региона относительно окна просмотра.
    ///
    /// `None`, если регион платформе неизвестен (ещё не отрисован).
    fn region_top(&self, region: RegionId) -> Option<f64>;

    /// Начать наблюдение пересечений региона с полем `margin_px`
    /// со всех сторон окна просмотра
    fn observe(&self, region: RegionId, margin_px: f64) -> broadcast::Receiver<IntersectionEvent>;

    /// Прекратить наблюдение пересечений региона
    fn unobserve(&self, region: RegionId);

    /// Подписка на события прокрутки страницы
    fn subscribe_scroll(&self) -> broadcast::Receiver<PageEvent>;

    /// Подписка на события смены видимости страницы
    fn subscribe_page_visibility(&self) -> broadcast::Receiver<PageEvent>;
}
