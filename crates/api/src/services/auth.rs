//! Login, token refresh, logout and the caller's own profile.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sitetrack_core::caller::CallerContext;
use sitetrack_core::error::CoreError;
use sitetrack_core::personnel::{normalize_email, validate_email, validate_person_name};
use sitetrack_core::status::{ActivityType, UserRole};
use sitetrack_db::models::activity_log::CreateActivityLog;
use sitetrack_db::models::session::CreateSession;
use sitetrack_db::models::user::{Personnel, UpdateUser, User};
use sitetrack_db::repositories::{ActivityLogRepo, SessionRepo, UserRepo};
use sqlx::PgPool;

use crate::auth::jwt::{
    generate_access_token, generate_refresh_token, hash_refresh_token, JwtConfig,
};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};

/// Maximum consecutive failed login attempts before locking the account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
const LOCK_DURATION_MINS: i64 = 15;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: Personnel,
}

/// Fields a caller may change on their own account.
#[derive(Debug, Deserialize)]
pub struct UpdateProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Authenticate with email and password.
///
/// Success stamps `last_login_at` and appends a `UserLogin` entry in one
/// transaction, then issues tokens.
pub async fn login(pool: &PgPool, jwt: &JwtConfig, input: &LoginRequest) -> AppResult<AuthResponse> {
    let user = UserRepo::find_by_email(pool, input.email.trim())
        .await?
        .ok_or_else(|| CoreError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    if !user.is_active {
        return Err(CoreError::Forbidden("Account is deactivated".into()).into());
    }

    if user.locked_until.is_some_and(|until| until > Utc::now()) {
        return Err(
            CoreError::Forbidden("Account is temporarily locked. Try again later.".into()).into(),
        );
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        let failures = UserRepo::increment_failed_login(pool, user.id).await?;
        if failures >= MAX_FAILED_ATTEMPTS {
            let lock_until = Utc::now() + Duration::minutes(LOCK_DURATION_MINS);
            UserRepo::lock_account(pool, user.id, lock_until).await?;
            tracing::warn!(user_id = user.id, failures, "Account locked after failed logins");
        }
        return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.into()).into());
    }

    let mut tx = pool.begin().await?;
    UserRepo::record_successful_login(&mut *tx, user.id).await?;
    ActivityLogRepo::create(
        &mut *tx,
        &CreateActivityLog::new(ActivityType::UserLogin, "User logged in")
            .description(format!("{} logged in", user.email))
            .user(user.id)
            .company(user.company_id),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(user_id = user.id, "User logged in");
    issue_tokens(pool, jwt, &user).await
}

/// Exchange a live refresh token for a new token pair. The old session is revoked.
pub async fn refresh(
    pool: &PgPool,
    jwt: &JwtConfig,
    input: &RefreshRequest,
) -> AppResult<AuthResponse> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_by_refresh_token_hash(pool, &token_hash)
        .await?
        .ok_or_else(|| CoreError::Unauthorized("Invalid or expired refresh token".into()))?;

    SessionRepo::revoke(pool, session.id).await?;

    let user = UserRepo::find_by_id(pool, session.user_id)
        .await?
        .ok_or_else(|| CoreError::Unauthorized("User no longer exists".into()))?;

    if !user.is_active {
        return Err(CoreError::Forbidden("Account is deactivated".into()).into());
    }

    issue_tokens(pool, jwt, &user).await
}

/// Revoke every session of the caller and append a `UserLogout` entry.
pub async fn logout(pool: &PgPool, caller: &CallerContext) -> AppResult<()> {
    let mut tx = pool.begin().await?;
    let revoked = SessionRepo::revoke_all_for_user(&mut *tx, caller.user_id).await?;
    ActivityLogRepo::create(
        &mut *tx,
        &CreateActivityLog::new(ActivityType::UserLogout, "User logged out")
            .user(caller.user_id)
            .company(caller.company_id),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(user_id = caller.user_id, revoked, "User logged out");
    Ok(())
}

pub async fn current_user(pool: &PgPool, caller: &CallerContext) -> AppResult<Personnel> {
    UserRepo::find_personnel(pool, caller.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", caller.user_id))
}

/// Update the caller's name, email or phone number.
pub async fn update_current_user(
    pool: &PgPool,
    caller: &CallerContext,
    input: &UpdateProfile,
) -> AppResult<Personnel> {
    if let Some(first_name) = &input.first_name {
        validate_person_name("First name", first_name)?;
    }
    if let Some(last_name) = &input.last_name {
        validate_person_name("Last name", last_name)?;
    }
    let email = match &input.email {
        Some(raw) => {
            let email = normalize_email(raw);
            validate_email(&email)?;
            if UserRepo::email_taken(pool, &email, Some(caller.user_id)).await? {
                return Err(
                    CoreError::Validation(format!("Email '{email}' is already in use")).into(),
                );
            }
            Some(email)
        }
        None => None,
    };

    let patch = UpdateUser {
        email,
        first_name: input.first_name.as_deref().map(|s| s.trim().to_string()),
        last_name: input.last_name.as_deref().map(|s| s.trim().to_string()),
        phone_number: input.phone_number.clone(),
        ..Default::default()
    };
    UserRepo::update(pool, caller.user_id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("User", caller.user_id))?;

    current_user(pool, caller).await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate access + refresh tokens, persist a session row, and build the response.
async fn issue_tokens(pool: &PgPool, jwt: &JwtConfig, user: &User) -> AppResult<AuthResponse> {
    let role = UserRole::from_id(user.role_id)
        .ok_or_else(|| CoreError::Internal(format!("User {} has unknown role", user.id)))?;
    let caller = CallerContext::new(user.id, role, user.company_id);

    let access_token = generate_access_token(&caller, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();
    SessionRepo::create(
        pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh_hash,
            expires_at: Utc::now() + Duration::days(jwt.refresh_token_expiry_days),
            user_agent: None,
            ip_address: None,
        },
    )
    .await?;

    let profile = UserRepo::find_personnel(pool, user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User", user.id))?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: jwt.access_token_expiry_mins * 60,
        user: profile,
    })
}
