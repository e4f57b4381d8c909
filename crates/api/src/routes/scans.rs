//! Route definitions for the `/qr-code` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::scans;
use crate::state::AppState;

/// Routes mounted at `/qr-code`.
///
/// ```text
/// POST /scan                         -> scan
/// POST /check-in                     -> check_in
/// POST /check-out                    -> check_out
/// POST /validate                     -> validate
/// GET  /today                        -> today
/// GET  /stats                        -> stats
/// GET  /recent                       -> recent
/// GET  /generate-test                -> generate_test
/// GET  /user/{user_id}/scans         -> user_scans
/// GET  /user/{user_id}/checked-in    -> presence
/// GET  /project/{project_id}/scans   -> project_scans
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scan", post(scans::scan))
        .route("/check-in", post(scans::check_in))
        .route("/check-out", post(scans::check_out))
        .route("/validate", post(scans::validate))
        .route("/today", get(scans::today))
        .route("/stats", get(scans::stats))
        .route("/recent", get(scans::recent))
        .route("/generate-test", get(scans::generate_test))
        .route("/user/{user_id}/scans", get(scans::user_scans))
        .route("/user/{user_id}/checked-in", get(scans::presence))
        .route("/project/{project_id}/scans", get(scans::project_scans))
}
