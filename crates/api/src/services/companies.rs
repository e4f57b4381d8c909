//! Companies. Non-admin callers only ever see their own company.

use sitetrack_core::caller::CallerContext;
use sitetrack_core::error::CoreError;
use sitetrack_core::types::DbId;
use sitetrack_db::models::company::{Company, CreateCompany, UpdateCompany};
use sitetrack_db::models::Page;
use sitetrack_db::repositories::CompanyRepo;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

fn validate_company_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Company name is required".into()));
    }
    Ok(())
}

pub async fn list(
    pool: &PgPool,
    caller: &CallerContext,
    limit: i64,
    offset: i64,
) -> AppResult<Page<Company>> {
    let only = caller.scope_company(None)?;
    let items = CompanyRepo::list(pool, only, limit, offset).await?;
    let total_count = CompanyRepo::count(pool, only).await?;
    Ok(Page { items, total_count })
}

pub async fn get(pool: &PgPool, caller: &CallerContext, id: DbId) -> AppResult<Company> {
    caller.ensure_company_visible(Some(id))?;
    CompanyRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Company", id))
}

/// Admin only; enforced by the route extractor.
pub async fn create(pool: &PgPool, input: &CreateCompany) -> AppResult<Company> {
    validate_company_name(&input.name)?;
    let company = CompanyRepo::create(pool, input).await?;
    tracing::info!(company_id = company.id, "Company created");
    Ok(company)
}

pub async fn update(pool: &PgPool, id: DbId, input: &UpdateCompany) -> AppResult<Company> {
    if let Some(name) = &input.name {
        validate_company_name(name)?;
    }
    CompanyRepo::update(pool, id, input)
        .await?
        .ok_or_else(|| AppError::not_found("Company", id))
}

pub async fn delete(pool: &PgPool, id: DbId) -> AppResult<()> {
    if !CompanyRepo::soft_delete(pool, id).await? {
        return Err(AppError::not_found("Company", id));
    }
    tracing::info!(company_id = id, "Company deactivated");
    Ok(())
}
