//! envelope-planner - budget and planner view models
//!
//! This library provides the presentation-layer adapters of the envelope
//! budgeting app: one loads and edits budgets, the other shows recurring plan
//! instances over a sliding window of months. Both sit on top of a content
//! provider owned by the host application and publish their results through
//! observable slots.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Data directory resolution and user settings
//! - `error`: Custom error types
//! - `models`: Months, money, budgets and plan instances
//! - `provider`: Content provider seam, reactive queries and async writes
//! - `diagnostics`: Sink for errors that are not returned to callers
//! - `viewmodel`: `BudgetViewModel`, `PlannerViewModel` and `LiveData`
//!
//! # Example
//!
//! ```rust,ignore
//! use envelope_planner::provider::ContentResolver;
//! use envelope_planner::viewmodel::PlannerViewModel;
//!
//! let resolver = ContentResolver::with_current_runtime(provider)?;
//! let calendar_id = settings.resolve_planner_calendar(&calendar)?;
//! let mut planner = PlannerViewModel::new(resolver, calendar_id, &settings.date_format)?;
//! planner.load_instances(None);
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod provider;
pub mod viewmodel;

pub use error::{EnvelopeError, EnvelopeResult};
