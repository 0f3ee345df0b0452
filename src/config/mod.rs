//! Configuration module for envelope-planner
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - User settings persistence
//! - Planner calendar provisioning

pub mod paths;
pub mod settings;

pub use paths::EnvelopePaths;
pub use settings::{PlannerCalendar, Settings};
