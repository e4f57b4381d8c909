//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Joined read models and the fact rows consumed by `sitetrack_core`
//! aggregation live next to the entity they are centred on.

pub mod activity_log;
pub mod company;
pub mod project;
pub mod qr_scan;
pub mod session;
pub mod task;
pub mod user;
pub mod user_project;

/// A page of rows plus the total number of rows matching the filter.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
}
