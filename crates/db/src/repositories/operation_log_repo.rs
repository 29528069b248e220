//! Repository for the `operation_logs` table.

use sqlx::PgPool;

use crate::models::operation_log::{
    CreateOperationLog, OperationLog, OperationLogQuery, OperationLogWithMachine,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, machine_id, date, start_time, end_time, total_hours, \
                        engineer, operator, not_operated_reason, \
                        maintenance_checklist_completed, created_at";

/// Provides insert and query operations for operation logs.
pub struct OperationLogRepo;

impl OperationLogRepo {
    /// Insert a new operation log, returning the created row.
    ///
    /// The caller is responsible for bumping the machine's
    /// `total_hours_run` via `MachineRepo::increment_total_hours`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateOperationLog,
    ) -> Result<OperationLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO operation_logs
                 (machine_id, date, start_time, end_time, total_hours, engineer, operator,
                  not_operated_reason, maintenance_checklist_completed)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OperationLog>(&query)
            .bind(input.machine_id)
            .bind(input.date)
            .bind(&input.start_time)
            .bind(&input.end_time)
            .bind(input.total_hours.unwrap_or(0))
            .bind(&input.engineer)
            .bind(&input.operator)
            .bind(&input.not_operated_reason)
            .bind(input.maintenance_checklist_completed)
            .fetch_one(pool)
            .await
    }

    /// List operation logs joined with machine and site names, newest first.
    ///
    /// `machine_id` takes precedence over `site_id`; the date range applies
    /// only when both bounds are present.
    pub async fn query(
        pool: &PgPool,
        params: &OperationLogQuery,
    ) -> Result<Vec<OperationLogWithMachine>, sqlx::Error> {
        let (machine_filter, site_filter) = match (params.machine_id, params.site_id) {
            (Some(machine_id), _) => (Some(machine_id), None),
            (None, Some(site_id)) => (None, Some(site_id)),
            (None, None) => (None, None),
        };
        let (start, end) = match (params.start_date, params.end_date) {
            (Some(start), Some(end)) => (Some(start), Some(end)),
            _ => (None, None),
        };

        sqlx::query_as::<_, OperationLogWithMachine>(
            "SELECT o.id, o.machine_id, m.name AS machine_name, s.name AS site_name, \
                    o.date, o.start_time, o.end_time, o.total_hours, o.engineer, o.operator, \
                    o.not_operated_reason, o.maintenance_checklist_completed, o.created_at \
             FROM operation_logs o \
             JOIN machines m ON m.id = o.machine_id \
             JOIN sites s ON s.id = m.site_id \
             WHERE ($1::bigint IS NULL OR o.machine_id = $1) \
               AND ($2::bigint IS NULL OR m.site_id = $2) \
               AND ($3::timestamptz IS NULL OR o.date >= $3) \
               AND ($4::timestamptz IS NULL OR o.date <= $4) \
             ORDER BY o.date DESC",
        )
        .bind(machine_filter)
        .bind(site_filter)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }
}
