//! Login attempt history model.

use serde::Serialize;
use sqlx::FromRow;
use upkeep_core::types::{DbId, Timestamp};

/// A row from the `login_history` table.
///
/// `user_id` is `None` for attempts against unknown email addresses.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginAttempt {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub success: bool,
    pub created_at: Timestamp,
}
