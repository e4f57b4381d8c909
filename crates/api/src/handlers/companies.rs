//! Handlers for the `/companies` resource.
//!
//! Reads are open to every authenticated user (scoped to their company);
//! mutations require [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use sitetrack_core::types::DbId;
use sitetrack_db::models::company::{Company, CreateCompany, UpdateCompany};
use sitetrack_db::models::Page;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::services::companies as service;
use crate::state::AppState;

/// GET /api/companies
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Page<Company>>>> {
    let (limit, offset) = params.resolve();
    let page = service::list(&state.pool, &auth.caller(), limit, offset).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/companies/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Company>>> {
    let company = service::get(&state.pool, &auth.caller(), id).await?;
    Ok(Json(DataResponse::new(company)))
}

/// POST /api/companies
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCompany>,
) -> AppResult<(StatusCode, Json<DataResponse<Company>>)> {
    let company = service::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(company))))
}

/// PUT /api/companies/{id}
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCompany>,
) -> AppResult<Json<DataResponse<Company>>> {
    let company = service::update(&state.pool, id, &input).await?;
    Ok(Json(DataResponse::new(company)))
}

/// DELETE /api/companies/{id}
///
/// Soft delete.
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    service::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
