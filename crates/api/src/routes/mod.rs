pub mod activity_logs;
pub mod auth;
pub mod companies;
pub mod dashboard;
pub mod health;
pub mod personnel;
pub mod projects;
pub mod reports;
pub mod scans;
pub mod tasks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                        login (public)
/// /auth/refresh                      refresh (public)
/// /auth/logout                       logout
/// /auth/current-user                 get, update own profile
///
/// /dashboard                         dashboard data
/// /dashboard/weekly-stats            eight-day check-in chart
///
/// /companies                         list, create (admin)
/// /companies/{id}                    get, update, delete (admin)
///
/// /personnel                         list, create
/// /personnel/{id}                    get, update, deactivate
/// /personnel/{id}/...                projects, scans, stats, reset-password
///
/// /projects                          list, create
/// /projects/{id}                     get, update, delete
/// /projects/{id}/...                 users, progress, complete
///
/// /qr-code/...                       scans, check-in/out, presence, stats
///
/// /tasks                             list, create
/// /tasks/{id}                        get, update, delete
/// /tasks/{id}/comments               list, add
/// /tasks/{id}/photos                 list, add
///
/// /activity-logs                     list
/// /activity-logs/{id}/read           mark read
///
/// /reports/...                       range, period and entity reports
/// ```
///
/// Everything except login and refresh requires `Authorization: Bearer <jwt>`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/dashboard", dashboard::router())
        .nest("/companies", companies::router())
        .nest("/personnel", personnel::router())
        .nest("/projects", projects::router())
        .nest("/qr-code", scans::router())
        .nest("/tasks", tasks::router())
        .nest("/activity-logs", activity_logs::router())
        .nest("/reports", reports::router())
}
