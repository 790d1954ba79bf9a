use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::debug;

/// Публикатор состояния видимости с debounce.
///
/// Превращает сырые запросы смены состояния в публикации через watch-канал,
/// схлопывая серии запросов: каждый новый запрос отменяет отложенный таймер
/// и перезапускает его с новым значением (побеждает последняя запись).
pub struct DebouncedEmitter {
    tx: watch::Sender<bool>,
    debounce: Duration,
    // Не более одного отложенного таймера на экземпляр
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl DebouncedEmitter {
    /// Создать публикатор; начальное опубликованное состояние - offscreen = true
    pub fn new(debounce: Duration) -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(true);
        (
            Self {
                tx,
                debounce,
                pending: Mutex::new(None),
            },
            rx,
        )
    }

    /// Запросить публикацию нового состояния.
    ///
    /// Публикация происходит не раньше следующего тика планировщика даже при
    /// нулевой задержке, чтобы порядок наблюдался одинаково с debounce и без.
    pub fn request(&self, offscreen: bool) {
        let mut pending = self.pending.lock();
        if let Some(prev) = pending.take() {
            prev.abort();
        }

        let tx = self.tx.clone();
        let debounce = self.debounce;
        *pending = Some(tokio::spawn(async move {
            sleep(debounce).await;
            debug!("Публикация состояния: offscreen = {}", offscreen);
            // Получатель мог быть отброшен хостом - это не ошибка
            let _ = tx.send(offscreen);
        }));
    }

    /// Синхронно отменить отложенную публикацию, если она есть
    pub fn cancel(&self) {
        if let Some(prev) = self.pending.lock().take() {
            prev.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_initial_state_is_offscreen() {
        let (_emitter, rx) = DebouncedEmitter::new(Duration::ZERO);
        assert!(*rx.borrow());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_debounce_publishes_on_next_tick() {
        let (emitter, mut rx) = DebouncedEmitter::new(Duration::ZERO);

        emitter.request(false);
        // Публикация не синхронна даже при нулевой задержке
        assert!(*rx.borrow());

        rx.changed().await.unwrap();
        assert!(!*rx.borrow());
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_to_last_value() {
        let (emitter, mut rx) = DebouncedEmitter::new(Duration::from_millis(100));

        emitter.request(false);
        sleep(Duration::from_millis(10)).await;
        emitter.request(true);
        sleep(Duration::from_millis(10)).await;
        emitter.request(false);

        // До истечения задержки после последнего запроса публикаций нет
        sleep(Duration::from_millis(99)).await;
        assert!(!rx.has_changed().unwrap());

        sleep(Duration::from_millis(2)).await;
        assert!(rx.has_changed().unwrap());
        assert!(!*rx.borrow_and_update());

        // Ровно одна публикация на всю серию
        sleep(Duration::from_millis(300)).await;
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_requests_converge_without_debounce() {
        let (emitter, mut rx) = DebouncedEmitter::new(Duration::ZERO);

        emitter.request(false);
        emitter.request(true);
        emitter.request(false);

        rx.changed().await.unwrap();
        assert!(!*rx.borrow_and_update());

        sleep(Duration::from_millis(10)).await;
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_publication() {
        let (emitter, rx) = DebouncedEmitter::new(Duration::from_millis(50));

        emitter.request(false);
        emitter.cancel();

        sleep(Duration::from_millis(200)).await;
        assert!(!rx.has_changed().unwrap());
        assert!(*rx.borrow());
    }
}
