//! Repository for the `companies` table.

use sqlx::PgPool;
use sitetrack_core::types::DbId;

use crate::models::company::{Company, CreateCompany, UpdateCompany};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, description, address, phone, email, tax_number, is_active, created_at, updated_at";

/// Provides CRUD operations for companies.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a new company, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCompany) -> Result<Company, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies (name, description, address, phone, email, tax_number)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(&input.address)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.tax_number)
            .fetch_one(pool)
            .await
    }

    /// Find an active company by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1 AND is_active = true");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List active companies by name. `only` restricts to a single company.
    pub async fn list(
        pool: &PgPool,
        only: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Company>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM companies
             WHERE is_active = true AND ($1::BIGINT IS NULL OR id = $1)
             ORDER BY name
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(only)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count active companies, optionally restricted to one.
    pub async fn count(pool: &PgPool, only: Option<DbId>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM companies
             WHERE is_active = true AND ($1::BIGINT IS NULL OR id = $1)",
        )
        .bind(only)
        .fetch_one(pool)
        .await
    }

    /// Update a company. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCompany,
    ) -> Result<Option<Company>, sqlx::Error> {
        let query = format!(
            "UPDATE companies SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                address = COALESCE($4, address),
                phone = COALESCE($5, phone),
                email = COALESCE($6, email),
                tax_number = COALESCE($7, tax_number)
             WHERE id = $1 AND is_active = true
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(&input.address)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.tax_number)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a company. Returns `true` if a row was deactivated.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE companies SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Display name of a company, active or not.
    pub async fn name_of(pool: &PgPool, id: DbId) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT name FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
