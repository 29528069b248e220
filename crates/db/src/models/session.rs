//! User session model and DTOs.
//!
//! Sessions store only the SHA-256 digest of the issued token; the
//! plaintext never touches the database.

use serde::Serialize;
use sqlx::FromRow;
use upkeep_core::types::{DbId, Timestamp};

/// A row from the `user_sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub is_active: bool,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for creating a new session at login.
#[derive(Debug)]
pub struct CreateSession {
    pub user_id: DbId,
    pub token_hash: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub expires_at: Timestamp,
}
