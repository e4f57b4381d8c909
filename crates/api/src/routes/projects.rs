//! Route definitions for the `/projects` resource.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                       -> list
/// POST   /                       -> create
/// GET    /stats                  -> stats
/// GET    /active                 -> active
/// GET    /delayed                -> delayed
/// GET    /recent                 -> recent
/// GET    /mine                   -> mine
/// GET    /user/{user_id}         -> for_user
/// GET    /{id}                   -> get_by_id
/// PUT    /{id}                   -> update
/// DELETE /{id}                   -> delete
/// GET    /{id}/users             -> users
/// POST   /{id}/users             -> assign_user
/// DELETE /{id}/users/{user_id}   -> remove_user
/// PUT    /{id}/progress          -> update_progress
/// POST   /{id}/complete          -> complete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route("/stats", get(projects::stats))
        .route("/active", get(projects::active))
        .route("/delayed", get(projects::delayed))
        .route("/recent", get(projects::recent))
        .route("/mine", get(projects::mine))
        .route("/user/{user_id}", get(projects::for_user))
        .route(
            "/{id}",
            get(projects::get_by_id)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route(
            "/{id}/users",
            get(projects::users).post(projects::assign_user),
        )
        .route("/{id}/users/{user_id}", delete(projects::remove_user))
        .route("/{id}/progress", put(projects::update_progress))
        .route("/{id}/complete", post(projects::complete))
}
