//! Repository for the `users` table.

use sitetrack_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::{
    CompanyCount, CreateUser, PersonFactRow, Personnel, PersonnelCounts, PersonnelFilter,
    RoleCount, UpdateUser, User,
};
use crate::repositories::filter::{BindValue, Filter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, first_name, last_name, phone_number, role_id, \
                       company_id, position, address, birth_date, hire_date, salary, is_active, \
                       last_login_at, failed_login_count, locked_until, created_at, updated_at";

/// Safe projection joined with the company name. Aliases: `u` users, `c` companies.
const PERSONNEL_COLUMNS: &str = "u.id, u.email, u.first_name, u.last_name, u.phone_number, \
                                 u.role_id, u.company_id, c.name AS company_name, u.position, \
                                 u.address, u.birth_date, u.hire_date, u.salary, u.is_active, \
                                 u.last_login_at, u.created_at";

const PERSONNEL_FROM: &str = "users u LEFT JOIN companies c ON c.id = u.company_id";

/// Users, authentication bookkeeping, and personnel queries.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        input: &CreateUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash, first_name, last_name, phone_number, role_id,
                                company_id, position, address, birth_date, hire_date, salary)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.phone_number)
            .bind(input.role_id)
            .bind(input.company_id)
            .bind(&input.position)
            .bind(&input.address)
            .bind(input.birth_date)
            .bind(input.hire_date)
            .bind(input.salary)
            .fetch_one(executor)
            .await
    }

    /// Find a user by id, active or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email, case-insensitively.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Whether another user already holds `email`.
    pub async fn email_taken(
        pool: &PgPool,
        email: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM users
                WHERE lower(email) = lower($1) AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Find one person with their company name, active or not.
    pub async fn find_personnel(pool: &PgPool, id: DbId) -> Result<Option<Personnel>, sqlx::Error> {
        let query = format!("SELECT {PERSONNEL_COLUMNS} FROM {PERSONNEL_FROM} WHERE u.id = $1");
        sqlx::query_as::<_, Personnel>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Paged personnel list with dynamic filters.
    pub async fn list(
        pool: &PgPool,
        params: &PersonnelFilter,
    ) -> Result<Vec<Personnel>, sqlx::Error> {
        let filter = build_personnel_filter(params);
        let bind_idx = filter.next_index();
        let direction = if params.sort_desc { "DESC" } else { "ASC" };
        let query = format!(
            "SELECT {PERSONNEL_COLUMNS} FROM {PERSONNEL_FROM} {} \
             ORDER BY u.{} {direction} NULLS LAST, u.id \
             LIMIT ${bind_idx} OFFSET ${}",
            filter.where_clause(),
            params.sort_column,
            bind_idx + 1
        );
        filter
            .bind_as(sqlx::query_as::<_, Personnel>(&query))
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(pool)
            .await
    }

    /// Count personnel matching the filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &PersonnelFilter) -> Result<i64, sqlx::Error> {
        let filter = build_personnel_filter(params);
        let query = format!("SELECT COUNT(*) FROM {PERSONNEL_FROM} {}", filter.where_clause());
        filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Active personnel, optionally restricted to one company, by name.
    pub async fn list_active(
        pool: &PgPool,
        company_id: Option<DbId>,
    ) -> Result<Vec<Personnel>, sqlx::Error> {
        let query = format!(
            "SELECT {PERSONNEL_COLUMNS} FROM {PERSONNEL_FROM}
             WHERE u.is_active = true AND ($1::BIGINT IS NULL OR u.company_id = $1)
             ORDER BY u.first_name, u.last_name"
        );
        sqlx::query_as::<_, Personnel>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Active personnel with an active assignment to `project_id`.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Personnel>, sqlx::Error> {
        let query = format!(
            "SELECT {PERSONNEL_COLUMNS} FROM {PERSONNEL_FROM}
             JOIN user_projects up ON up.user_id = u.id
             WHERE up.project_id = $1 AND up.is_active = true AND u.is_active = true
             ORDER BY u.first_name, u.last_name"
        );
        sqlx::query_as::<_, Personnel>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Most recently logged-in active personnel.
    pub async fn top_by_last_login(
        pool: &PgPool,
        company_id: Option<DbId>,
        limit: i64,
    ) -> Result<Vec<Personnel>, sqlx::Error> {
        let query = format!(
            "SELECT {PERSONNEL_COLUMNS} FROM {PERSONNEL_FROM}
             WHERE u.is_active = true AND ($1::BIGINT IS NULL OR u.company_id = $1)
             ORDER BY u.last_login_at DESC NULLS LAST, u.id
             LIMIT $2"
        );
        sqlx::query_as::<_, Personnel>(&query)
            .bind(company_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                email = COALESCE($2, email),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                phone_number = COALESCE($5, phone_number),
                role_id = COALESCE($6, role_id),
                company_id = COALESCE($7, company_id),
                position = COALESCE($8, position),
                address = COALESCE($9, address),
                birth_date = COALESCE($10, birth_date),
                hire_date = COALESCE($11, hire_date),
                salary = COALESCE($12, salary),
                is_active = COALESCE($13, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.phone_number)
            .bind(input.role_id)
            .bind(input.company_id)
            .bind(&input.position)
            .bind(&input.address)
            .bind(input.birth_date)
            .bind(input.hire_date)
            .bind(input.salary)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a user. Returns `true` if a row was deactivated.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace a user's password hash and clear any lockout.
    pub async fn update_password(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, failed_login_count = 0, locked_until = NULL
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Increment the failed login counter, returning the new count.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE users SET failed_login_count = failed_login_count + 1
             WHERE id = $1
             RETURNING failed_login_count",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Lock an account until `until`.
    pub async fn lock_account(pool: &PgPool, id: DbId, until: Timestamp) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET locked_until = $2 WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Reset failure bookkeeping and stamp the login time.
    pub async fn record_successful_login(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET failed_login_count = 0, locked_until = NULL, last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Total number of user rows, active or not.
    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }

    /// Number of active personnel, optionally in one company.
    pub async fn count_active(pool: &PgPool, company_id: Option<DbId>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users
             WHERE is_active = true AND ($1::BIGINT IS NULL OR company_id = $1)",
        )
        .bind(company_id)
        .fetch_one(pool)
        .await
    }

    /// Total, active and inactive headcounts.
    pub async fn counts(
        pool: &PgPool,
        company_id: Option<DbId>,
    ) -> Result<PersonnelCounts, sqlx::Error> {
        sqlx::query_as::<_, PersonnelCounts>(
            "SELECT COUNT(*) AS total_personnel,
                    COUNT(*) FILTER (WHERE is_active) AS active_personnel,
                    COUNT(*) FILTER (WHERE NOT is_active) AS inactive_personnel
             FROM users
             WHERE $1::BIGINT IS NULL OR company_id = $1",
        )
        .bind(company_id)
        .fetch_one(pool)
        .await
    }

    /// Active headcount per role.
    pub async fn count_by_role(
        pool: &PgPool,
        company_id: Option<DbId>,
    ) -> Result<Vec<RoleCount>, sqlx::Error> {
        sqlx::query_as::<_, RoleCount>(
            "SELECT role_id, COUNT(*) AS count FROM users
             WHERE is_active = true AND ($1::BIGINT IS NULL OR company_id = $1)
             GROUP BY role_id
             ORDER BY role_id",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }

    /// Active headcount per company. People without a company form one group.
    pub async fn count_by_company(
        pool: &PgPool,
        company_id: Option<DbId>,
    ) -> Result<Vec<CompanyCount>, sqlx::Error> {
        sqlx::query_as::<_, CompanyCount>(
            "SELECT u.company_id, c.name AS company_name, COUNT(*) AS count
             FROM users u LEFT JOIN companies c ON c.id = u.company_id
             WHERE u.is_active = true AND ($1::BIGINT IS NULL OR u.company_id = $1)
             GROUP BY u.company_id, c.name
             ORDER BY c.name NULLS LAST",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }

    /// Everyone in scope with their active assignment count, for reports.
    pub async fn person_facts(
        pool: &PgPool,
        company_id: Option<DbId>,
    ) -> Result<Vec<PersonFactRow>, sqlx::Error> {
        sqlx::query_as::<_, PersonFactRow>(
            "SELECT u.id, u.first_name, u.last_name, u.role_id, u.is_active,
                    (SELECT COUNT(*) FROM user_projects up
                     WHERE up.user_id = u.id AND up.is_active = true) AS active_assignments
             FROM users u
             WHERE $1::BIGINT IS NULL OR u.company_id = $1
             ORDER BY u.first_name, u.last_name",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }

    /// Salaries of active personnel that have one.
    pub async fn active_salaries(
        pool: &PgPool,
        company_id: Option<DbId>,
    ) -> Result<Vec<f64>, sqlx::Error> {
        sqlx::query_scalar::<_, f64>(
            "SELECT salary FROM users
             WHERE is_active = true AND salary IS NOT NULL
               AND ($1::BIGINT IS NULL OR company_id = $1)",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }
}

/// Translate a [`PersonnelFilter`] into a dynamic `WHERE` clause.
fn build_personnel_filter(params: &PersonnelFilter) -> Filter {
    let mut filter = Filter::new();
    if let Some(company_id) = params.company_id {
        filter.push("u.company_id = {}", BindValue::BigInt(company_id));
    }
    if let Some(user_id) = params.exclude_user_id {
        filter.push("u.id <> {}", BindValue::BigInt(user_id));
    }
    if let Some(ref pattern) = params.search_pattern {
        filter.push(
            "(u.first_name ILIKE {} OR u.last_name ILIKE {} OR u.email ILIKE {})",
            BindValue::Text(pattern.clone()),
        );
    }
    if let Some(role_id) = params.role_id {
        filter.push("u.role_id = {}", BindValue::SmallInt(role_id));
    }
    if let Some(is_active) = params.is_active {
        filter.push("u.is_active = {}", BindValue::Bool(is_active));
    }
    filter
}
