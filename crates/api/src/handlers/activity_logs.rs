//! Handlers for the `/activity-logs` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use sitetrack_core::types::DbId;
use sitetrack_db::models::Page;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::activity_logs::{self as service, ActivityLogQuery, ActivityView};
use crate::state::AppState;

/// GET /api/activity-logs
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ActivityLogQuery>,
) -> AppResult<Json<DataResponse<Page<ActivityView>>>> {
    let page = service::list(&state.pool, &auth.caller(), &query).await?;
    Ok(Json(DataResponse::new(page)))
}

/// POST /api/activity-logs/{id}/read
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    service::mark_read(&state.pool, &auth.caller(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
