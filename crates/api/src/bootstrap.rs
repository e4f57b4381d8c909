//! First-run setup.

use chrono::Utc;
use sitetrack_core::personnel::{normalize_email, validate_email};
use sitetrack_core::status::UserRole;
use sitetrack_db::models::user::CreateUser;
use sitetrack_db::repositories::UserRepo;
use sitetrack_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

/// Create the configured Admin account when the users table is empty.
///
/// Returns `true` if an account was created.
pub async fn ensure_bootstrap_admin(pool: &DbPool, config: &ServerConfig) -> AppResult<bool> {
    let Some(admin) = &config.bootstrap_admin else {
        return Ok(false);
    };
    if UserRepo::count_all(pool).await? > 0 {
        tracing::debug!("Users exist, skipping bootstrap admin");
        return Ok(false);
    }

    let email = normalize_email(&admin.email);
    validate_email(&email)?;
    validate_password_strength(&admin.password)?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            email,
            password_hash,
            first_name: "System".to_string(),
            last_name: "Administrator".to_string(),
            phone_number: None,
            role_id: UserRole::Admin.id(),
            company_id: None,
            position: None,
            address: None,
            birth_date: None,
            hire_date: config.calendar.today(Utc::now()),
            salary: None,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap admin created");
    Ok(true)
}
