//! Reactive query bus over a content provider
//!
//! The provider itself is synchronous and owned elsewhere. The resolver runs
//! its calls on blocking threads, broadcasts change notifications after
//! writes, and turns a query into a stream of result sets that re-runs
//! whenever related content changes.

use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::query::{Query, Selection};
use super::row::{ContentValues, Row};
use super::subscription::Subscription;
use super::uri::ContentUri;
use crate::error::{EnvelopeError, EnvelopeResult};

const CHANGE_BUFFER: usize = 64;

/// The externally owned row store
pub trait ContentProvider: Send + Sync {
    fn query(&self, query: &Query) -> EnvelopeResult<Vec<Row>>;

    /// Delete matching rows, returning how many were removed
    fn delete(&self, uri: &ContentUri, selection: Option<&Selection>) -> EnvelopeResult<usize>;

    /// Update matching rows, returning how many were changed
    fn update(
        &self,
        uri: &ContentUri,
        values: &ContentValues,
        selection: Option<&Selection>,
    ) -> EnvelopeResult<usize>;
}

/// What a query handler wants after seeing a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

struct Inner {
    provider: Arc<dyn ContentProvider>,
    changes: broadcast::Sender<ContentUri>,
    runtime: Handle,
}

/// Cheap-to-clone entry point to a content provider
#[derive(Clone)]
pub struct ContentResolver {
    inner: Arc<Inner>,
}

impl ContentResolver {
    pub fn new(provider: Arc<dyn ContentProvider>, runtime: Handle) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Self {
            inner: Arc::new(Inner {
                provider,
                changes,
                runtime,
            }),
        }
    }

    /// Build a resolver on the runtime the caller is running in
    pub fn with_current_runtime(provider: Arc<dyn ContentProvider>) -> EnvelopeResult<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| EnvelopeError::Runtime(format!("No tokio runtime available: {}", e)))?;
        Ok(Self::new(provider, runtime))
    }

    /// Tell live queries that content under `uri` changed
    pub fn notify_change(&self, uri: &ContentUri) {
        trace!(%uri, "content changed");
        // No receivers simply means no live queries
        let _ = self.inner.changes.send(uri.clone());
    }

    pub(crate) fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.inner.runtime.spawn(future)
    }

    /// Run a query once
    pub async fn query(&self, query: Query) -> EnvelopeResult<Vec<Row>> {
        let provider = self.inner.provider.clone();
        self.inner
            .runtime
            .spawn_blocking(move || provider.query(&query))
            .await?
    }

    /// Delete rows and notify live queries when anything was removed
    pub async fn delete(
        &self,
        uri: ContentUri,
        selection: Option<Selection>,
    ) -> EnvelopeResult<usize> {
        let provider = self.inner.provider.clone();
        let target = uri.clone();
        let deleted = self
            .inner
            .runtime
            .spawn_blocking(move || provider.delete(&target, selection.as_ref()))
            .await??;
        if deleted > 0 {
            self.notify_change(&uri);
        }
        Ok(deleted)
    }

    /// Update rows and notify live queries when anything changed
    pub async fn update(
        &self,
        uri: ContentUri,
        values: ContentValues,
        selection: Option<Selection>,
    ) -> EnvelopeResult<usize> {
        let provider = self.inner.provider.clone();
        let target = uri.clone();
        let updated = self
            .inner
            .runtime
            .spawn_blocking(move || provider.update(&target, &values, selection.as_ref()))
            .await??;
        if updated > 0 {
            self.notify_change(&uri);
        }
        Ok(updated)
    }

    /// Describe a query stream; nothing runs until it is subscribed
    ///
    /// A live query re-runs after every change notified under a related uri.
    /// A query that is not live emits exactly once.
    pub fn create_query(&self, query: Query, live: bool) -> QueryObservable {
        QueryObservable {
            resolver: self.clone(),
            query,
            live,
        }
    }
}

/// A query waiting for a subscriber
pub struct QueryObservable {
    resolver: ContentResolver,
    query: Query,
    live: bool,
}

impl QueryObservable {
    /// Start the query, feeding every result set to `handler`
    ///
    /// The stream ends when the handler returns [`Flow::Stop`], after the
    /// first error, or after the single emission of a query that is not live.
    pub fn subscribe<F>(self, mut handler: F) -> Subscription
    where
        F: FnMut(EnvelopeResult<Vec<Row>>) -> Flow + Send + 'static,
    {
        let Self {
            resolver,
            query,
            live,
        } = self;
        // Subscribe before the first run so no change slips between the two
        let mut changes = live.then(|| resolver.inner.changes.subscribe());
        let runner = resolver.clone();

        let task = resolver.spawn(async move {
            loop {
                debug!(uri = %query.uri, live, "running query");
                let result = runner.query(query.clone()).await;
                let failed = result.is_err();
                if handler(result) == Flow::Stop || failed {
                    break;
                }
                let Some(changes) = changes.as_mut() else {
                    break;
                };
                if !wait_for_change(changes, &query.uri).await {
                    break;
                }
            }
        });

        Subscription::new(task)
    }
}

/// Wait until a change related to `uri` arrives; false once the bus is gone
async fn wait_for_change(changes: &mut broadcast::Receiver<ContentUri>, uri: &ContentUri) -> bool {
    loop {
        match changes.recv().await {
            Ok(changed) if changed.is_related(uri) => return true,
            Ok(_) => continue,
            // Missed notifications might have been relevant
            Err(RecvError::Lagged(_)) => return true,
            Err(RecvError::Closed) => return false,
        }
    }
}
