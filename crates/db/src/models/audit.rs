//! Audit log entity models and DTOs.
//!
//! Audit logs are append-only (no `updated_at`). Every admin mutation and
//! auth event records one entry with the acting user, the affected resource,
//! and a JSON detail blob.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use upkeep_core::types::{DbId, Timestamp};

/// A single audit log entry. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub action: String,
    pub resource: Option<String>,
    pub resource_id: Option<DbId>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
}

/// Audit log entry joined with the acting user's name and email.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogWithUser {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub action: String,
    pub resource: Option<String>,
    pub resource_id: Option<DbId>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for appending an audit log entry.
#[derive(Debug, Clone)]
pub struct CreateAuditLog {
    pub user_id: Option<DbId>,
    pub action: String,
    pub resource: Option<String>,
    pub resource_id: Option<DbId>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Query filters for listing audit logs.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    pub user_id: Option<DbId>,
    pub action: Option<String>,
    pub resource: Option<String>,
    /// Maximum entries to return. Defaults to 50, capped at 200.
    pub limit: Option<i64>,
}
