//! Activity log listing and the read flag.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sitetrack_core::activity::ActivityPresentation;
use sitetrack_core::caller::CallerContext;
use sitetrack_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use sitetrack_core::status::StatusId;
use sitetrack_core::types::{DbId, Timestamp};
use sitetrack_db::models::activity_log::{ActivityLog, ActivityLogFilter};
use sitetrack_db::models::Page;
use sitetrack_db::repositories::ActivityLogRepo;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// An activity log row with its icon, colour and relative time.
#[derive(Debug, Serialize)]
pub struct ActivityView {
    #[serde(flatten)]
    pub log: ActivityLog,
    #[serde(flatten)]
    pub presentation: ActivityPresentation,
}

impl ActivityView {
    pub fn new(log: ActivityLog, now: Timestamp) -> Self {
        let presentation =
            ActivityPresentation::new(log.activity_type_id, log.priority_id, log.activity_at, now);
        Self { log, presentation }
    }
}

/// Present a batch of rows against a single "now".
pub fn present(logs: Vec<ActivityLog>) -> Vec<ActivityView> {
    let now = Utc::now();
    logs.into_iter().map(|log| ActivityView::new(log, now)).collect()
}

#[derive(Debug, Default, Deserialize)]
pub struct ActivityLogQuery {
    pub company_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub activity_type_id: Option<StatusId>,
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn list(
    pool: &PgPool,
    caller: &CallerContext,
    query: &ActivityLogQuery,
) -> AppResult<Page<ActivityView>> {
    let filter = ActivityLogFilter {
        company_id: caller.scope_company(query.company_id)?,
        project_id: query.project_id,
        user_id: query.user_id,
        activity_type_id: query.activity_type_id,
        unread_only: query.unread_only,
        limit: clamp_limit(query.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        offset: clamp_offset(query.offset),
        ..Default::default()
    };
    let logs = ActivityLogRepo::list(pool, &filter).await?;
    let total_count = ActivityLogRepo::count(pool, &filter).await?;
    Ok(Page {
        items: present(logs),
        total_count,
    })
}

/// Mark one entry read. Entries outside the caller's company look missing.
pub async fn mark_read(pool: &PgPool, caller: &CallerContext, id: DbId) -> AppResult<()> {
    let company_id = caller.scope_company(None)?;
    if !ActivityLogRepo::mark_read(pool, id, company_id).await? {
        return Err(AppError::not_found("ActivityLog", id));
    }
    Ok(())
}
