//! Observable value slots
//!
//! A `LiveData` holds the latest value a view model published. Observers get
//! a `watch` receiver and see every post after they subscribed; late
//! observers still read the current value.

use std::sync::Arc;

use tokio::sync::watch;

pub struct LiveData<T> {
    sender: Arc<watch::Sender<Option<T>>>,
}

impl<T> Clone for LiveData<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T> Default for LiveData<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LiveData<T> {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Publish a value, replacing the previous one
    pub fn post_value(&self, value: T) {
        self.sender.send_replace(Some(value));
    }

    /// Subscribe to future posts
    pub fn observe(&self) -> watch::Receiver<Option<T>> {
        self.sender.subscribe()
    }

    pub fn has_value(&self) -> bool {
        self.sender.borrow().is_some()
    }
}

impl<T: Clone> LiveData<T> {
    /// The latest published value
    pub fn value(&self) -> Option<T> {
        self.sender.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::next_value;

    #[test]
    fn test_starts_empty() {
        let slot = LiveData::<u32>::new();
        assert!(!slot.has_value());
        assert_eq!(slot.value(), None);
    }

    #[test]
    fn test_post_replaces() {
        let slot = LiveData::new();
        slot.post_value(1);
        slot.post_value(2);
        assert_eq!(slot.value(), Some(2));
        assert_eq!(slot.clone().value(), Some(2));
    }

    #[tokio::test]
    async fn test_observer_sees_posts() {
        let slot = LiveData::new();
        let mut rx = slot.observe();
        let poster = slot.clone();
        tokio::spawn(async move { poster.post_value("ready") });
        assert_eq!(next_value(&mut rx).await, "ready");
    }
}
