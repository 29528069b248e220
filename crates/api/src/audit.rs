//! Audit trail recording.
//!
//! Every admin mutation and auth event appends an `audit_logs` row with the
//! acting user, the affected resource, and a JSON detail blob. Recording is
//! best-effort: a failed insert is logged and the request proceeds.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sqlx::PgPool;
use upkeep_core::types::DbId;
use upkeep_db::models::audit::CreateAuditLog;
use upkeep_db::repositories::AuditLogRepo;

/// Client metadata captured alongside audit and login-history rows.
///
/// Infallible extractor: both fields are `None` when the headers are absent.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    /// From `x-forwarded-for` (first hop).
    pub ip_address: Option<String>,
    /// From `user-agent`.
    pub user_agent: Option<String>,
}

impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip_address = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string());

        let user_agent = parts
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        Ok(ClientInfo {
            ip_address,
            user_agent,
        })
    }
}

/// Append an audit log entry. Failures are logged, never propagated.
pub async fn record(
    pool: &PgPool,
    user_id: Option<DbId>,
    action: &str,
    resource: &str,
    resource_id: Option<DbId>,
    details: Option<serde_json::Value>,
    client: &ClientInfo,
) {
    let entry = CreateAuditLog {
        user_id,
        action: action.to_string(),
        resource: Some(resource.to_string()),
        resource_id,
        details,
        ip_address: client.ip_address.clone(),
        user_agent: client.user_agent.clone(),
    };

    if let Err(e) = AuditLogRepo::create(pool, &entry).await {
        tracing::warn!(action, error = %e, "Failed to record audit log entry");
    }
}
