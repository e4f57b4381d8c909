mod common;

use common::{seed_company, seed_user};
use sitetrack_core::personnel::DEFAULT_SORT_COLUMN;
use sitetrack_core::search::like_pattern;
use sitetrack_core::status::UserRole;
use sitetrack_db::models::user::PersonnelFilter;
use sitetrack_db::repositories::UserRepo;
use sqlx::PgPool;

fn filter() -> PersonnelFilter {
    PersonnelFilter {
        sort_column: DEFAULT_SORT_COLUMN,
        limit: 50,
        ..Default::default()
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn list_is_scoped_and_excludes_the_caller(pool: PgPool) {
    let mine = seed_company(&pool, "Mine").await;
    let theirs = seed_company(&pool, "Theirs").await;
    let me = seed_user(&pool, "me@example.com", UserRole::OfficeStaff, Some(mine)).await;
    seed_user(&pool, "colleague@example.com", UserRole::SiteStaff, Some(mine)).await;
    seed_user(&pool, "stranger@example.com", UserRole::SiteStaff, Some(theirs)).await;

    let params = PersonnelFilter {
        company_id: Some(mine),
        exclude_user_id: Some(me),
        ..filter()
    };
    let rows = UserRepo::list(&pool, &params).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].email, "colleague@example.com");
    assert_eq!(UserRepo::count(&pool, &params).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn search_matches_email_case_insensitively(pool: PgPool) {
    let company = seed_company(&pool, "Mine").await;
    seed_user(&pool, "Alice.Builder@example.com", UserRole::SiteStaff, Some(company)).await;
    seed_user(&pool, "bob@example.com", UserRole::SiteStaff, Some(company)).await;

    let params = PersonnelFilter {
        search_pattern: like_pattern(Some("alice")),
        ..filter()
    };
    let rows = UserRepo::list(&pool, &params).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].company_name.as_deref(), Some("Mine"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn emails_are_unique_case_insensitively(pool: PgPool) {
    seed_user(&pool, "dup@example.com", UserRole::SiteStaff, None).await;
    assert!(UserRepo::email_taken(&pool, "DUP@example.com", None).await.unwrap());

    let err = sqlx::query(
        "INSERT INTO users (email, password_hash, first_name, last_name) VALUES ($1, 'x', 'a', 'b')",
    )
    .bind("Dup@Example.com")
    .execute(&pool)
    .await
    .unwrap_err();
    assert_eq!(
        err.as_database_error().and_then(|e| e.code()).as_deref(),
        Some("23505")
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn failed_logins_accumulate_until_success(pool: PgPool) {
    let user = seed_user(&pool, "locked@example.com", UserRole::SiteStaff, None).await;

    assert_eq!(UserRepo::increment_failed_login(&pool, user).await.unwrap(), 1);
    assert_eq!(UserRepo::increment_failed_login(&pool, user).await.unwrap(), 2);

    UserRepo::record_successful_login(&pool, user).await.unwrap();
    let row = UserRepo::find_by_id(&pool, user).await.unwrap().unwrap();
    assert_eq!(row.failed_login_count, 0);
    assert!(row.last_login_at.is_some());
}
