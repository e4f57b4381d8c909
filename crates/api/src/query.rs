//! Shared query parameter types for API handlers.

use serde::Deserialize;
use sitetrack_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use sitetrack_core::types::DbId;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// `(limit, offset)` clamped to the default page bounds.
    pub fn resolve(&self) -> (i64, i64) {
        (
            clamp_limit(self.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
            clamp_offset(self.offset),
        )
    }
}

/// Optional `?company_id=` filter.
#[derive(Debug, Default, Deserialize)]
pub struct CompanyParams {
    pub company_id: Option<DbId>,
}

/// Optional `?project_id=` filter.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectParams {
    pub project_id: Option<DbId>,
}

/// Optional `?user_id=` filter.
#[derive(Debug, Default, Deserialize)]
pub struct UserParams {
    pub user_id: Option<DbId>,
}

/// Optional `?count=` for "recent" lists. Each endpoint clamps it to its own bounds.
#[derive(Debug, Default, Deserialize)]
pub struct CountParams {
    pub count: Option<i64>,
}
