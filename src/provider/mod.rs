//! Content provider seam
//!
//! The row store, its change notifications and the calendar provider are
//! owned outside this crate. This module describes how they are addressed
//! (`ContentUri`, `Query`, `Row`), the trait they implement
//! (`ContentProvider`), and the reactive plumbing the view models use on top
//! of them (`ContentResolver`, `AsyncWriteHandler`, `Subscription`).

pub mod contract;
pub mod handler;
pub mod mapping;
pub mod query;
pub mod resolver;
pub mod row;
pub mod subscription;
pub mod uri;

#[cfg(test)]
pub(crate) mod testing;

pub use handler::{AsyncWriteHandler, WriteListener, WriteTicket};
pub use mapping::{map_to_list, map_to_list_lenient, map_to_one, map_to_one_or_default};
pub use query::{Query, Selection};
pub use resolver::{ContentProvider, ContentResolver, Flow, QueryObservable};
pub use row::{ContentValues, Row, Value};
pub use subscription::{CompositeSubscription, Subscription};
pub use uri::ContentUri;
