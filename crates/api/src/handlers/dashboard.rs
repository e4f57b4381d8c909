//! Handlers for the `/dashboard` resource.

use axum::extract::State;
use axum::Json;
use sitetrack_core::aggregation::DashboardWeeklyStats;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::dashboard::{self as service, DashboardData};
use crate::state::AppState;

/// GET /api/dashboard
pub async fn data(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardData>>> {
    let data = service::data(&state.pool, &auth.caller(), &state.config.calendar).await?;
    Ok(Json(DataResponse::new(data)))
}

/// GET /api/dashboard/weekly-stats
pub async fn weekly_stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardWeeklyStats>>> {
    let stats = service::weekly(&state.pool, &auth.caller(), &state.config.calendar).await?;
    Ok(Json(DataResponse::new(stats)))
}
