//! Repository for the `audit_logs` table.

use sqlx::PgPool;

use crate::models::audit::{AuditLog, AuditLogWithUser, AuditQuery, CreateAuditLog};

/// Column list for `audit_logs` SELECT queries.
const COLUMNS: &str = "id, user_id, action, resource, resource_id, details, \
                        ip_address, user_agent, created_at";

/// Default page size for audit log listing.
const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for audit log listing.
const MAX_LIMIT: i64 = 200;

/// Append and query operations for the audit trail.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append a single audit log entry.
    pub async fn create(pool: &PgPool, entry: &CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_logs
                 (user_id, action, resource, resource_id, details, ip_address, user_agent)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(entry.user_id)
            .bind(&entry.action)
            .bind(&entry.resource)
            .bind(entry.resource_id)
            .bind(&entry.details)
            .bind(&entry.ip_address)
            .bind(&entry.user_agent)
            .fetch_one(pool)
            .await
    }

    /// Query audit logs with optional filters, newest first, joined with the
    /// acting user's name and email.
    pub async fn query(
        pool: &PgPool,
        params: &AuditQuery,
    ) -> Result<Vec<AuditLogWithUser>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);

        sqlx::query_as::<_, AuditLogWithUser>(
            "SELECT a.id, a.user_id, u.name AS user_name, u.email AS user_email, \
                    a.action, a.resource, a.resource_id, a.details, \
                    a.ip_address, a.user_agent, a.created_at \
             FROM audit_logs a \
             LEFT JOIN users u ON u.id = a.user_id \
             WHERE ($1::bigint IS NULL OR a.user_id = $1) \
               AND ($2::text IS NULL OR a.action = $2) \
               AND ($3::text IS NULL OR a.resource = $3) \
             ORDER BY a.created_at DESC \
             LIMIT $4",
        )
        .bind(params.user_id)
        .bind(&params.action)
        .bind(&params.resource)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
