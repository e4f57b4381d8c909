mod common;

use common::{seed_company, seed_project, seed_user};
use sitetrack_core::project::clamp_progress;
use sitetrack_core::status::UserRole;
use sitetrack_db::repositories::{ProjectRepo, UserProjectRepo};
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn progress_is_stored_clamped(pool: PgPool) {
    let company = seed_company(&pool, "Acme Build").await;
    let project = seed_project(&pool, "Tower A", company).await;

    let stored = ProjectRepo::set_progress(&pool, project, clamp_progress(150.0))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.progress, 100.0);

    let stored = ProjectRepo::set_progress(&pool, project, clamp_progress(-10.0))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.progress, 0.0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn out_of_range_progress_is_rejected_by_the_schema(pool: PgPool) {
    let company = seed_company(&pool, "Acme Build").await;
    let project = seed_project(&pool, "Tower A", company).await;

    let err = ProjectRepo::set_progress(&pool, project, 150.0).await.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("ck_projects_progress_range"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn soft_delete_reports_only_the_first_transition(pool: PgPool) {
    let company = seed_company(&pool, "Acme Build").await;
    let project = seed_project(&pool, "Tower A", company).await;

    assert!(ProjectRepo::soft_delete(&pool, project).await.unwrap());
    assert!(!ProjectRepo::soft_delete(&pool, project).await.unwrap());

    let row = ProjectRepo::find_by_id_any(&pool, project).await.unwrap().unwrap();
    assert!(!row.is_active);
    assert!(ProjectRepo::find_by_id(&pool, project).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn reassignment_reuses_the_existing_row(pool: PgPool) {
    let company = seed_company(&pool, "Acme Build").await;
    let project = seed_project(&pool, "Tower A", company).await;
    let user = seed_user(&pool, "worker@example.com", UserRole::SiteStaff, Some(company)).await;

    let first = UserProjectRepo::assign(&pool, user, project, "Team Member", None)
        .await
        .unwrap();
    let second = UserProjectRepo::assign(&pool, user, project, "Foreman", None)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.role.as_deref(), Some("Foreman"));
    assert!(second.assigned_at >= first.assigned_at);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_projects WHERE user_id = $1")
        .bind(user)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn unassign_then_assign_reactivates(pool: PgPool) {
    let company = seed_company(&pool, "Acme Build").await;
    let project = seed_project(&pool, "Tower A", company).await;
    let user = seed_user(&pool, "worker@example.com", UserRole::SiteStaff, Some(company)).await;

    UserProjectRepo::assign(&pool, user, project, "Team Member", None)
        .await
        .unwrap();
    assert!(UserProjectRepo::unassign(&pool, user, project).await.unwrap());
    assert!(!UserProjectRepo::unassign(&pool, user, project).await.unwrap());

    let ended = UserProjectRepo::find(&pool, user, project).await.unwrap().unwrap();
    assert!(!ended.is_active);
    assert!(ended.unassigned_at.is_some());

    let again = UserProjectRepo::assign(&pool, user, project, "Team Member", None)
        .await
        .unwrap();
    assert!(again.is_active);
    assert!(again.unassigned_at.is_none());
    assert_eq!(UserProjectRepo::list_assignees(&pool, project).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn recent_projects_respect_company_scope(pool: PgPool) {
    let mine = seed_company(&pool, "Mine").await;
    let theirs = seed_company(&pool, "Theirs").await;
    seed_project(&pool, "Ours 1", mine).await;
    seed_project(&pool, "Ours 2", mine).await;
    seed_project(&pool, "Not ours", theirs).await;

    let recent = ProjectRepo::recent(&pool, Some(mine), None, 10).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert!(recent.iter().all(|p| p.project.company_id == mine));

    let all = ProjectRepo::recent(&pool, None, None, 10).await.unwrap();
    assert_eq!(all.len(), 3);
}
