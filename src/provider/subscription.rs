//! Handles for running query tasks
//!
//! Dropping a `Subscription` cancels the task behind it, so an owner that
//! replaces or discards its handle never leaks a live query.

use tokio::task::{AbortHandle, JoinHandle};

/// Cancellation handle for one running query task
#[derive(Debug)]
pub struct Subscription {
    handle: AbortHandle,
}

impl Subscription {
    pub(crate) fn new<T>(task: JoinHandle<T>) -> Self {
        Self {
            handle: task.abort_handle(),
        }
    }

    /// Cancel the task; no further emissions reach the handler
    pub fn dispose(&self) {
        self.handle.abort();
    }

    /// True once the task completed or was cancelled
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A group of subscriptions released together
#[derive(Debug, Default)]
pub struct CompositeSubscription {
    subscriptions: Vec<Subscription>,
}

impl CompositeSubscription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a subscription, forgetting the ones that already finished
    pub fn add(&mut self, subscription: Subscription) {
        self.subscriptions.retain(|s| !s.is_finished());
        self.subscriptions.push(subscription);
    }

    /// Number of tracked subscriptions still running
    pub fn active(&self) -> usize {
        self.subscriptions.iter().filter(|s| !s.is_finished()).count()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Cancel every tracked subscription
    pub fn dispose(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.dispose();
        }
    }
}
