//! Core data models for envelope-planner
//!
//! Budgets, money, calendar months and plan instances. All of them are
//! immutable snapshots produced from query results.

pub mod budget;
pub mod currency;
pub mod money;
pub mod month;
pub mod plan;

pub use budget::{Budget, Grouping, HOME_AGGREGATE_ID};
pub use currency::{CurrencyContext, CurrencyUnit, StaticCurrencyContext};
pub use money::Money;
pub use month::Month;
pub use plan::{PlanInstance, PlanInstanceState, PlanInstanceUpdate};
