//! Token-keyed asynchronous writes
//!
//! Writes are started and forgotten. Completion is delivered to an optional
//! listener along with the caller's token, and the returned ticket can be
//! awaited by callers that care.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::query::Selection;
use super::resolver::ContentResolver;
use super::row::ContentValues;
use super::uri::ContentUri;
use crate::error::{EnvelopeError, EnvelopeResult};

/// Called once a write finishes, with the token and the affected row count
pub type WriteListener = Box<dyn FnOnce(i32, &EnvelopeResult<usize>) + Send + 'static>;

/// Awaitable completion of a started write
///
/// Dropping the ticket does not cancel the write.
#[derive(Debug)]
pub struct WriteTicket {
    token: i32,
    handle: JoinHandle<EnvelopeResult<usize>>,
}

impl WriteTicket {
    pub fn token(&self) -> i32 {
        self.token
    }

    /// Wait for the write without looking at its result
    pub async fn completed(self) {
        let _ = self.handle.await;
    }
}

impl Future for WriteTicket {
    type Output = EnvelopeResult<usize>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle)
            .poll(cx)
            .map(|joined| joined.map_err(EnvelopeError::from).and_then(|result| result))
    }
}

/// Starts deletes and updates in the background
#[derive(Clone)]
pub struct AsyncWriteHandler {
    resolver: ContentResolver,
}

impl AsyncWriteHandler {
    pub fn new(resolver: ContentResolver) -> Self {
        Self { resolver }
    }

    pub fn start_delete(
        &self,
        token: i32,
        uri: ContentUri,
        selection: Option<Selection>,
        listener: Option<WriteListener>,
    ) -> WriteTicket {
        let resolver = self.resolver.clone();
        self.start(token, listener, async move {
            debug!(%uri, token, "starting delete");
            resolver.delete(uri, selection).await
        })
    }

    pub fn start_update(
        &self,
        token: i32,
        uri: ContentUri,
        values: ContentValues,
        selection: Option<Selection>,
        listener: Option<WriteListener>,
    ) -> WriteTicket {
        let resolver = self.resolver.clone();
        self.start(token, listener, async move {
            debug!(%uri, token, "starting update");
            resolver.update(uri, values, selection).await
        })
    }

    /// A ticket for a write that needed no round trip to the provider
    pub fn completed(&self, token: i32, affected: usize) -> WriteTicket {
        self.start(token, None, async move { Ok(affected) })
    }

    fn start<F>(&self, token: i32, listener: Option<WriteListener>, write: F) -> WriteTicket
    where
        F: Future<Output = EnvelopeResult<usize>> + Send + 'static,
    {
        let handle = self.resolver.spawn(async move {
            let result = write.await;
            match &result {
                Ok(affected) => debug!(token, affected, "write complete"),
                Err(e) => warn!(token, error = %e, "write failed"),
            }
            if let Some(listener) = listener {
                listener(token, &result);
            }
            result
        });
        WriteTicket { token, handle }
    }
}
