//! Pure domain logic for the construction-site tracker.
//!
//! Nothing in this crate touches the database or the network. Repositories
//! fetch rows; the functions here turn them into presence state, statistics
//! and reports.

pub mod activity;
pub mod aggregation;
pub mod calendar;
pub mod caller;
pub mod error;
pub mod personnel;
pub mod presence;
pub mod project;
pub mod reports;
pub mod scan;
pub mod search;
pub mod status;
pub mod task;
pub mod types;
