use sqlx::PgPool;

/// Connect, migrate, and verify the lookup tables are seeded.
#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_full_bootstrap(pool: PgPool) {
    sitetrack_db::health_check(&pool).await.unwrap();

    let tables = [
        "user_roles",
        "project_statuses",
        "activity_types",
        "activity_priorities",
        "scan_types",
        "task_statuses",
        "task_priorities",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert!(count.0 > 0, "{table} should have seed data, got 0 rows");
    }
}

/// Every core enum id has a matching lookup row.
#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_lookup_ids_match_core_enums(pool: PgPool) {
    use sitetrack_core::status::{ProjectStatus, ScanType, TaskStatus, UserRole};

    async fn ids(pool: &PgPool, table: &str) -> Vec<i16> {
        sqlx::query_scalar(&format!("SELECT id FROM {table} ORDER BY id"))
            .fetch_all(pool)
            .await
            .unwrap()
    }

    let roles: Vec<i16> = UserRole::ALL.iter().map(|r| r.id()).collect();
    let project_statuses: Vec<i16> = ProjectStatus::ALL.iter().map(|s| s.id()).collect();
    let scan_types: Vec<i16> = ScanType::ALL.iter().map(|s| s.id()).collect();
    let task_statuses: Vec<i16> = TaskStatus::ALL.iter().map(|s| s.id()).collect();

    assert_eq!(ids(&pool, "user_roles").await, roles);
    assert_eq!(ids(&pool, "project_statuses").await, project_statuses);
    assert_eq!(ids(&pool, "scan_types").await, scan_types);
    assert_eq!(ids(&pool, "task_statuses").await, task_statuses);
}
