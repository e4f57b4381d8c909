//! HTTP handlers.
//!
//! Handlers extract the caller, path and body, delegate to [`crate::services`],
//! and wrap results in the `{ "data": ... }` envelope.

pub mod activity_logs;
pub mod auth;
pub mod companies;
pub mod dashboard;
pub mod personnel;
pub mod projects;
pub mod reports;
pub mod scans;
pub mod tasks;
