//! Repository for the `login_history` table.

use sqlx::PgPool;
use upkeep_core::types::DbId;

use crate::models::login_history::LoginAttempt;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, ip_address, user_agent, success, created_at";

/// Records and queries login attempts.
pub struct LoginHistoryRepo;

impl LoginHistoryRepo {
    /// Record a login attempt. `user_id` is `None` for unknown emails.
    pub async fn record(
        pool: &PgPool,
        user_id: Option<DbId>,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
        success: bool,
    ) -> Result<LoginAttempt, sqlx::Error> {
        let query = format!(
            "INSERT INTO login_history (user_id, ip_address, user_agent, success)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LoginAttempt>(&query)
            .bind(user_id)
            .bind(ip_address)
            .bind(user_agent)
            .bind(success)
            .fetch_one(pool)
            .await
    }

    /// List a user's most recent login attempts.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<LoginAttempt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM login_history
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, LoginAttempt>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
