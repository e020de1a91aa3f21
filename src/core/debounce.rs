use std::time::Duration;

/// Something that can stop a scheduled job before it fires.
pub trait Cancel {
    fn cancel(&self);
}

impl<T> Cancel for tokio::task::JoinHandle<T> {
    fn cancel(&self) {
        self.abort();
    }
}

/// A single pending-timer slot.
///
/// Storing a new handle always cancels the previous one first, so at most one
/// scheduled job survives a burst of input.
#[derive(Debug)]
pub struct Debounce<H: Cancel> {
    delay: Duration,
    pending: Option<H>,
}

impl<H: Cancel> Debounce<H> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel whatever is pending and park `handle` in the slot.
    pub fn replace(&mut self, handle: H) {
        self.cancel();
        self.pending = Some(handle);
    }

    /// Called when the pending job fired; empties the slot without cancelling.
    pub fn settle(&mut self) {
        self.pending = None;
    }

    pub fn cancel(&mut self) {
        if let Some(previous) = self.pending.take() {
            previous.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<H: Cancel> Drop for Debounce<H> {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};

    struct CountCancels(Rc<Cell<u32>>);

    impl Cancel for CountCancels {
        fn cancel(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn replace_cancels_previous() {
        let cancelled = Rc::new(Cell::new(0));
        let mut slot = Debounce::new(Duration::from_millis(300));
        slot.replace(CountCancels(cancelled.clone()));
        assert_eq!(cancelled.get(), 0);
        slot.replace(CountCancels(cancelled.clone()));
        assert_eq!(cancelled.get(), 1);
        slot.replace(CountCancels(cancelled.clone()));
        assert_eq!(cancelled.get(), 2);
        assert!(slot.is_pending());
    }

    #[test]
    fn settle_does_not_cancel() {
        let cancelled = Rc::new(Cell::new(0));
        let mut slot = Debounce::new(Duration::from_millis(300));
        slot.replace(CountCancels(cancelled.clone()));
        slot.settle();
        assert!(!slot.is_pending());
        drop(slot);
        assert_eq!(cancelled.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn burst_fires_once_with_last_value() {
        let fired: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let mut slot = Debounce::new(Duration::from_millis(300));

        for query in ["d", "do", "dot", "dota"] {
            let fired = fired.clone();
            let delay = slot.delay();
            let query = query.to_string();
            slot.replace(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                fired.lock().unwrap().push(query);
            }));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(*fired.lock().unwrap(), vec!["dota".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn quiet_periods_fire_separately() {
        let fired: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let mut slot = Debounce::new(Duration::from_millis(300));

        for query in ["a", "b"] {
            let fired = fired.clone();
            let delay = slot.delay();
            let query = query.to_string();
            slot.replace(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                fired.lock().unwrap().push(query);
            }));
            tokio::time::sleep(Duration::from_millis(400)).await;
        }

        assert_eq!(*fired.lock().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }
}
