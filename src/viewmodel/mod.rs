//! View models
//!
//! Each view model owns one content query at a time and publishes decoded
//! values through `LiveData` slots the presentation layer observes.

pub mod budget;
pub mod live_data;
pub mod planner;

pub use budget::{budget_projection, BudgetViewModel};
pub use live_data::LiveData;
pub use planner::{LoadDirection, PlannerTitle, PlannerViewModel, TitleSegment};
