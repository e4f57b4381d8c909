//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login          -> login (public)
/// POST /refresh        -> refresh (public)
/// POST /logout         -> logout
/// GET  /current-user   -> current_user
/// PUT  /current-user   -> update_current_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route(
            "/current-user",
            get(auth::current_user).put(auth::update_current_user),
        )
}
