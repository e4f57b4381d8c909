//! Route definitions for the `/activity-logs` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::activity_logs;
use crate::state::AppState;

/// Routes mounted at `/activity-logs`.
///
/// ```text
/// GET  /            -> list
/// POST /{id}/read   -> mark_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(activity_logs::list))
        .route("/{id}/read", post(activity_logs::mark_read))
}
