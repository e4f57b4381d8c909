//! Route definitions for the `/tasks` resource.
//!
//! Comments and photos are nested under `/tasks/{id}/...`.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /                                -> list
/// POST   /                                -> create
/// GET    /search                          -> list
/// GET    /recent                          -> recent
/// GET    /overdue                         -> overdue
/// GET    /stats                           -> stats
/// GET    /company/{company_id}/stats      -> company_stats
/// GET    /user/{user_id}                  -> by_user
/// GET    /project/{project_id}            -> by_project
/// GET    /status/{status_id}              -> by_status
/// GET    /priority/{priority_id}          -> by_priority
/// GET    /{id}                            -> get_by_id
/// PUT    /{id}                            -> update
/// DELETE /{id}                            -> delete
/// PUT    /{id}/status                     -> update_status
/// POST   /{id}/complete                   -> complete
/// POST   /{id}/assign                     -> assign
///
/// GET    /{id}/comments                   -> list_comments
/// POST   /{id}/comments                   -> add_comment
/// DELETE /{id}/comments/{comment_id}      -> delete_comment
/// GET    /{id}/photos                     -> list_photos
/// POST   /{id}/photos                     -> add_photo
/// DELETE /{id}/photos/{photo_id}          -> delete_photo
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list).post(tasks::create))
        .route("/search", get(tasks::list))
        .route("/recent", get(tasks::recent))
        .route("/overdue", get(tasks::overdue))
        .route("/stats", get(tasks::stats))
        .route("/company/{company_id}/stats", get(tasks::company_stats))
        .route("/user/{user_id}", get(tasks::by_user))
        .route("/project/{project_id}", get(tasks::by_project))
        .route("/status/{status_id}", get(tasks::by_status))
        .route("/priority/{priority_id}", get(tasks::by_priority))
        .route(
            "/{id}",
            get(tasks::get_by_id)
                .put(tasks::update)
                .delete(tasks::delete),
        )
        .route("/{id}/status", put(tasks::update_status))
        .route("/{id}/complete", post(tasks::complete))
        .route("/{id}/assign", post(tasks::assign))
        .route(
            "/{id}/comments",
            get(tasks::list_comments).post(tasks::add_comment),
        )
        .route("/{id}/comments/{comment_id}", delete(tasks::delete_comment))
        .route(
            "/{id}/photos",
            get(tasks::list_photos).post(tasks::add_photo),
        )
        .route("/{id}/photos/{photo_id}", delete(tasks::delete_photo))
}
