//! Route definitions for the `/personnel` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::personnel;
use crate::state::AppState;

/// Routes mounted at `/personnel`.
///
/// ```text
/// GET    /                            -> list
/// POST   /                            -> create
/// GET    /stats                       -> general_stats
/// GET    /active                      -> active
/// GET    /company/{company_id}        -> by_company
/// GET    /project/{project_id}        -> by_project
/// GET    /{id}                        -> get_by_id
/// PUT    /{id}                        -> update
/// DELETE /{id}                        -> delete
/// POST   /{id}/reset-password         -> reset_password (admin)
/// GET    /{id}/projects               -> list_projects
/// POST   /{id}/projects               -> assign_project
/// DELETE /{id}/projects/{project_id}  -> remove_project
/// GET    /{id}/scans                  -> scans
/// GET    /{id}/stats                  -> stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(personnel::list).post(personnel::create))
        .route("/stats", get(personnel::general_stats))
        .route("/active", get(personnel::active))
        .route("/company/{company_id}", get(personnel::by_company))
        .route("/project/{project_id}", get(personnel::by_project))
        .route(
            "/{id}",
            get(personnel::get_by_id)
                .put(personnel::update)
                .delete(personnel::delete),
        )
        .route("/{id}/reset-password", post(personnel::reset_password))
        .route(
            "/{id}/projects",
            get(personnel::list_projects).post(personnel::assign_project),
        )
        .route(
            "/{id}/projects/{project_id}",
            delete(personnel::remove_project),
        )
        .route("/{id}/scans", get(personnel::scans))
        .route("/{id}/stats", get(personnel::stats))
}
