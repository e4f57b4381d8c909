//! Route definitions for the `/reports` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// GET  /dashboard                          -> dashboard
/// GET  /projects                           -> projects
/// GET  /personnel                          -> personnel
/// GET  /qr-scans                           -> qr_scans
/// GET  /daily-activity                     -> daily_activity
/// GET  /weekly                             -> weekly
/// GET  /monthly                            -> monthly
/// GET  /company-performance/{company_id}   -> company_performance
/// GET  /user-performance/{user_id}         -> user_performance
/// GET  /project-progress/{project_id}      -> project_progress
/// GET  /financial                          -> financial
/// GET  /types                              -> types
/// POST /export/{format}                    -> export (501)
/// POST /custom                             -> custom (501)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(reports::dashboard))
        .route("/projects", get(reports::projects))
        .route("/personnel", get(reports::personnel))
        .route("/qr-scans", get(reports::qr_scans))
        .route("/daily-activity", get(reports::daily_activity))
        .route("/weekly", get(reports::weekly))
        .route("/monthly", get(reports::monthly))
        .route(
            "/company-performance/{company_id}",
            get(reports::company_performance),
        )
        .route("/user-performance/{user_id}", get(reports::user_performance))
        .route(
            "/project-progress/{project_id}",
            get(reports::project_progress),
        )
        .route("/financial", get(reports::financial))
        .route("/types", get(reports::types))
        .route("/export/{format}", post(reports::export))
        .route("/custom", post(reports::custom))
}
