//! Handlers for the `/auth` resource: first-run setup, login/logout,
//! registration, profile, token validation, sessions, and audit logs.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use upkeep_core::error::CoreError;
use upkeep_core::roles::{validate_role, ROLE_ADMIN};
use upkeep_core::types::DbId;
use upkeep_db::models::audit::{AuditLogWithUser, AuditQuery};
use upkeep_db::models::session::{CreateSession, Session};
use upkeep_db::models::user::{CreateUser, User, UserInfo, UserResponse};
use upkeep_db::repositories::{AuditLogRepo, LoginHistoryRepo, SessionRepo, UserRepo};

use crate::audit::{self, ClientInfo};
use crate::auth::jwt::{generate_token, hash_token, validate_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{bearer_token, AuthUser};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/setup`.
#[derive(Debug, Deserialize)]
pub struct SetupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Successful authentication response returned by setup and login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
    pub session_id: DbId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response for `GET /auth/check-initialization`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializationStatus {
    pub initialized: bool,
    pub user_count: i64,
}

/// Response for `GET /auth/validate-token`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenValidation {
    pub valid: bool,
    pub user: UserInfo,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/auth/check-initialization
///
/// Public: reports whether any user exists yet so the dashboard can route
/// first-run visitors to the setup form.
pub async fn check_initialization(
    State(state): State<AppState>,
) -> AppResult<Json<InitializationStatus>> {
    let user_count = UserRepo::count(&state.pool).await?;
    Ok(Json(InitializationStatus {
        initialized: user_count > 0,
        user_count,
    }))
}

/// POST /api/v1/auth/setup
///
/// First-time setup: create the initial admin user. Public, but refuses
/// with 403 once any user exists.
pub async fn setup(
    State(state): State<AppState>,
    client: ClientInfo,
    Json(input): Json<SetupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    validate_setup_fields(&input.name, &input.email)?;
    validate_password_strength(&input.password).map_err(CoreError::Validation)?;

    let existing = UserRepo::count(&state.pool).await?;
    if existing > 0 {
        return Err(AppError::Core(CoreError::Forbidden(
            "System already initialized".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name,
            email: input.email,
            password_hash,
            role: ROLE_ADMIN.to_string(),
        },
    )
    .await?;

    let (token, session_id) = issue_token_and_session(&state, &user, &client).await?;

    audit::record(
        &state.pool,
        Some(user.id),
        "SYSTEM_SETUP",
        "System",
        None,
        Some(serde_json::json!({ "setupBy": user.email })),
        &client,
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserInfo::from(&user),
            session_id,
            message: Some("System initialized successfully".to_string()),
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Every attempt (including failures
/// against unknown emails) lands in `login_history`.
pub async fn login(
    State(state): State<AppState>,
    client: ClientInfo,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = match UserRepo::find_by_email(&state.pool, &input.email).await? {
        Some(user) => user,
        None => {
            record_login_attempt(&state, None, &client, false).await;
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid credentials".into(),
            )));
        }
    };

    if !user.is_active {
        record_login_attempt(&state, Some(user.id), &client, false).await;
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        record_login_attempt(&state, Some(user.id), &client, false).await;
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid credentials".into(),
        )));
    }

    let (token, session_id) = issue_token_and_session(&state, &user, &client).await?;

    UserRepo::record_successful_login(&state.pool, user.id).await?;
    record_login_attempt(&state, Some(user.id), &client, true).await;

    audit::record(
        &state.pool,
        Some(user.id),
        "LOGIN",
        "User",
        Some(user.id),
        Some(serde_json::json!({ "method": "email" })),
        &client,
    )
    .await;

    Ok(Json(AuthResponse {
        token,
        user: UserInfo::from(&user),
        session_id,
        message: None,
    }))
}

/// POST /api/v1/auth/logout
///
/// Invalidate the presenting session by its token hash.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    client: ClientInfo,
    headers: HeaderMap,
) -> AppResult<Json<super::MessageResponse>> {
    let token = bearer_token(&headers)?;
    SessionRepo::invalidate_by_token_hash(&state.pool, &hash_token(token)).await?;

    audit::record(
        &state.pool,
        Some(auth.user_id),
        "LOGOUT",
        "User",
        Some(auth.user_id),
        None,
        &client,
    )
    .await;

    Ok(Json(super::MessageResponse {
        message: "Logged out successfully".to_string(),
    }))
}

/// POST /api/v1/auth/register
///
/// Create a user. Requires an admin token, except while the system has no
/// users at all (first-run bootstrap, same rule as the original setup flow).
pub async fn register(
    State(state): State<AppState>,
    client: ClientInfo,
    headers: HeaderMap,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    validate_setup_fields(&input.name, &input.email)?;
    validate_role(&input.role)?;
    validate_password_strength(&input.password).map_err(CoreError::Validation)?;

    let user_count = UserRepo::count(&state.pool).await?;

    // Past bootstrap, only admins may register users.
    let acting_user_id = if user_count > 0 {
        let token = bearer_token(&headers)?;
        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;
        if claims.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Some(claims.sub)
    } else {
        None
    };

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Email already in use".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name,
            email: input.email,
            password_hash,
            role: input.role.clone(),
        },
    )
    .await?;

    audit::record(
        &state.pool,
        acting_user_id,
        "CREATE_USER",
        "User",
        Some(user.id),
        Some(serde_json::json!({
            "createdBy": acting_user_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "SYSTEM_SETUP".to_string()),
            "userRole": input.role,
        })),
        &client,
    )
    .await;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /api/v1/auth/profile
///
/// The authenticated user's own record, sans password hash.
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;

    Ok(Json(UserResponse::from(user)))
}

/// GET /api/v1/auth/validate-token
///
/// Public token check used by the dashboard on page load: verifies the
/// signature and expiry, then confirms the user still exists and is active.
pub async fn validate(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<TokenValidation>> {
    let token = bearer_token(&headers)?;
    let claims = validate_token(token, &state.config.jwt)
        .map_err(|_| AppError::Core(CoreError::Unauthorized("Invalid or expired token".into())))?;

    let user = UserRepo::find_by_id(&state.pool, claims.sub)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

    Ok(Json(TokenValidation {
        valid: true,
        user: UserInfo::from(&user),
    }))
}

/// GET /api/v1/auth/sessions
///
/// The caller's active sessions (admin only).
pub async fn sessions(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<Vec<Session>>> {
    let sessions = SessionRepo::list_active_for_user(&state.pool, admin.user_id).await?;
    Ok(Json(sessions))
}

/// GET /api/v1/auth/audit-logs
///
/// Filterable audit trail (admin only).
pub async fn audit_logs(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(params): Query<AuditQuery>,
) -> AppResult<Json<Vec<AuditLogWithUser>>> {
    let logs = AuditLogRepo::query(&state.pool, &params).await?;
    Ok(Json(logs))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate a token, persist the session row keyed by its hash, and return
/// both the token and the session id.
async fn issue_token_and_session(
    state: &AppState,
    user: &User,
    client: &ClientInfo,
) -> AppResult<(String, DbId)> {
    let token = generate_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let expires_at = Utc::now() + chrono::Duration::days(state.config.jwt.token_expiry_days);

    let session = SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            token_hash: hash_token(&token),
            ip_address: client.ip_address.clone(),
            user_agent: client.user_agent.clone(),
            expires_at,
        },
    )
    .await?;

    Ok((token, session.id))
}

/// Record a login attempt, logging (not propagating) storage failures so a
/// broken history table cannot block authentication.
async fn record_login_attempt(
    state: &AppState,
    user_id: Option<DbId>,
    client: &ClientInfo,
    success: bool,
) {
    if let Err(e) = LoginHistoryRepo::record(
        &state.pool,
        user_id,
        client.ip_address.as_deref(),
        client.user_agent.as_deref(),
        success,
    )
    .await
    {
        tracing::warn!(error = %e, "Failed to record login attempt");
    }
}

/// Shared name/email presence validation for setup and registration.
fn validate_setup_fields(name: &str, email: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() || email.trim().is_empty() {
        return Err(CoreError::Validation(
            "Name and email are required".to_string(),
        ));
    }
    Ok(())
}
