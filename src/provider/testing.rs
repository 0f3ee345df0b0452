//! In-memory provider double for tests

use std::collections::HashMap;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use super::query::{Query, Selection};
use super::resolver::ContentProvider;
use super::row::{ContentValues, Row};
use super::uri::ContentUri;
use crate::error::{EnvelopeError, EnvelopeResult};

/// Serves canned rows per uri and records every call
///
/// Rows registered for a uri also answer queries on uris beneath it.
#[derive(Default)]
pub(crate) struct FakeProvider {
    rows: Mutex<HashMap<ContentUri, Vec<Row>>>,
    queries: Mutex<Vec<Query>>,
    deletes: Mutex<Vec<(ContentUri, Option<Selection>)>>,
    updates: Mutex<Vec<(ContentUri, ContentValues)>>,
    delete_count: Mutex<Option<usize>>,
    query_error: Mutex<Option<EnvelopeError>>,
    write_error: Mutex<Option<EnvelopeError>>,
    held: Mutex<bool>,
    released: Condvar,
}

impl FakeProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_rows(&self, uri: &ContentUri, rows: Vec<Row>) {
        self.rows.lock().unwrap().insert(uri.clone(), rows);
    }

    /// Make deletes report this count instead of one per selection argument
    pub(crate) fn set_delete_count(&self, count: usize) {
        *self.delete_count.lock().unwrap() = Some(count);
    }

    pub(crate) fn fail_queries(&self, error: EnvelopeError) {
        *self.query_error.lock().unwrap() = Some(error);
    }

    pub(crate) fn fail_writes(&self, error: EnvelopeError) {
        *self.write_error.lock().unwrap() = Some(error);
    }

    /// Park every query after it is recorded until [`Self::release_queries`]
    pub(crate) fn hold_queries(&self) {
        *self.held.lock().unwrap() = true;
    }

    pub(crate) fn release_queries(&self) {
        *self.held.lock().unwrap() = false;
        self.released.notify_all();
    }

    pub(crate) fn queries(&self) -> Vec<Query> {
        self.queries.lock().unwrap().clone()
    }

    pub(crate) fn deletes(&self) -> Vec<(ContentUri, Option<Selection>)> {
        self.deletes.lock().unwrap().clone()
    }

    pub(crate) fn updates(&self) -> Vec<(ContentUri, ContentValues)> {
        self.updates.lock().unwrap().clone()
    }

    fn rows_for(&self, uri: &ContentUri) -> Vec<Row> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .filter(|(registered, _)| {
                registered.path_segments().len() <= uri.path_segments().len()
                    && registered.is_related(uri)
            })
            .max_by_key(|(registered, _)| registered.path_segments().len())
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default()
    }
}

impl ContentProvider for FakeProvider {
    fn query(&self, query: &Query) -> EnvelopeResult<Vec<Row>> {
        self.queries.lock().unwrap().push(query.clone());
        let held = self.held.lock().unwrap();
        drop(self.released.wait_while(held, |held| *held).unwrap());
        if let Some(error) = self.query_error.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self.rows_for(&query.uri))
    }

    fn delete(&self, uri: &ContentUri, selection: Option<&Selection>) -> EnvelopeResult<usize> {
        self.deletes
            .lock()
            .unwrap()
            .push((uri.clone(), selection.cloned()));
        if let Some(error) = self.write_error.lock().unwrap().clone() {
            return Err(error);
        }
        let requested = selection.map(|s| s.args.len()).unwrap_or(0);
        Ok(self.delete_count.lock().unwrap().unwrap_or(requested))
    }

    fn update(
        &self,
        uri: &ContentUri,
        values: &ContentValues,
        _selection: Option<&Selection>,
    ) -> EnvelopeResult<usize> {
        self.updates
            .lock()
            .unwrap()
            .push((uri.clone(), values.clone()));
        if let Some(error) = self.write_error.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(1)
    }
}

const WAIT: Duration = Duration::from_secs(2);

/// Next message on a test channel, failing the test after a timeout
pub(crate) async fn next_emission<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> T {
    tokio::time::timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for emission")
        .expect("channel closed")
}

/// Next value posted to an observed slot
pub(crate) async fn next_value<T: Clone>(rx: &mut watch::Receiver<Option<T>>) -> T {
    tokio::time::timeout(WAIT, async {
        loop {
            rx.changed().await.expect("slot dropped");
            if let Some(value) = rx.borrow_and_update().clone() {
                return value;
            }
        }
    })
    .await
    .expect("timed out waiting for value")
}
