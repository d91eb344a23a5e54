use std::sync::mpsc::{self, Receiver, Sender};

/// Holds a value and notifies every subscriber of each new value.
///
/// Notifications are sent synchronously from [`WatchedBox::set`], in
/// subscription order. Subscribers whose receiver was dropped are pruned.
/// Every value reaches every receiver; a receiver may still coalesce what
/// queued up between polls, as `PlotPanel::poll_results` does.
pub struct WatchedBox<T: Clone> {
    value: T,
    subscribers: Vec<Sender<T>>,
}

impl<T: Clone> WatchedBox<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            subscribers: Vec::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn subscribe(&mut self) -> Receiver<T> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
        let current = &self.value;
        self.subscribers
            .retain(|subscriber| subscriber.send(current.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: Clone + Default> Default for WatchedBox<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
