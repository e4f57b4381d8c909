//! Route definitions for the `/companies` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::companies;
use crate::state::AppState;

/// Routes mounted at `/companies`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create (admin)
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update (admin)
/// DELETE /{id}   -> delete (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(companies::list).post(companies::create))
        .route(
            "/{id}",
            get(companies::get_by_id)
                .put(companies::update)
                .delete(companies::delete),
        )
}
