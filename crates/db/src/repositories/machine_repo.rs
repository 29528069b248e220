//! Repository for the `machines` table.

use sqlx::PgPool;
use upkeep_core::types::DbId;

use crate::models::machine::{CreateMachine, Machine, MachineWithSite, UpdateMachine};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, site_id, machine_type, status, desired_daily_hours, \
                        total_hours_run, last_maintenance_date, next_maintenance_date, \
                        created_at, updated_at";

/// Joined column list for listings that include the site name.
const JOINED_COLUMNS: &str = "m.id, m.name, m.site_id, s.name AS site_name, m.machine_type, \
                               m.status, m.desired_daily_hours, m.total_hours_run, \
                               m.last_maintenance_date, m.next_maintenance_date, \
                               m.created_at, m.updated_at";

/// Default machine type when none is given.
const DEFAULT_MACHINE_TYPE: &str = "general";

/// Default machine status when none is given.
const DEFAULT_STATUS: &str = "operational";

/// Days until the first scheduled maintenance of a new machine.
const DEFAULT_MAINTENANCE_LEAD_DAYS: i64 = 30;

/// Provides CRUD operations for machines.
pub struct MachineRepo;

impl MachineRepo {
    /// Insert a new machine, returning the created row.
    ///
    /// Defaults: type `general`, status `operational`, next maintenance 30
    /// days out, zero hours run, last maintenance now.
    pub async fn create(pool: &PgPool, input: &CreateMachine) -> Result<Machine, sqlx::Error> {
        let next_maintenance = input.next_maintenance_date.unwrap_or_else(|| {
            chrono::Utc::now() + chrono::Duration::days(DEFAULT_MAINTENANCE_LEAD_DAYS)
        });
        let query = format!(
            "INSERT INTO machines
                 (name, site_id, machine_type, status, desired_daily_hours, next_maintenance_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Machine>(&query)
            .bind(&input.name)
            .bind(input.site_id)
            .bind(input.machine_type.as_deref().unwrap_or(DEFAULT_MACHINE_TYPE))
            .bind(input.status.as_deref().unwrap_or(DEFAULT_STATUS))
            .bind(input.desired_daily_hours)
            .bind(next_maintenance)
            .fetch_one(pool)
            .await
    }

    /// Find a machine by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Machine>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM machines WHERE id = $1");
        sqlx::query_as::<_, Machine>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all machines joined with their site names, ordered by name.
    pub async fn list_with_site(pool: &PgPool) -> Result<Vec<MachineWithSite>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM machines m
             JOIN sites s ON s.id = m.site_id
             ORDER BY m.name"
        );
        sqlx::query_as::<_, MachineWithSite>(&query)
            .fetch_all(pool)
            .await
    }

    /// List all machines of a machine type (exact match).
    pub async fn list_by_type(
        pool: &PgPool,
        machine_type: &str,
    ) -> Result<Vec<Machine>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM machines WHERE machine_type = $1 ORDER BY name");
        sqlx::query_as::<_, Machine>(&query)
            .bind(machine_type)
            .fetch_all(pool)
            .await
    }

    /// Distinct non-blank machine types, sorted ascending.
    pub async fn distinct_machine_types(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT machine_type FROM machines \
             WHERE TRIM(machine_type) <> '' \
             ORDER BY machine_type",
        )
        .fetch_all(pool)
        .await
    }

    /// Replace a machine's editable fields.
    ///
    /// `status`, `machine_type`, and `next_maintenance_date` keep their
    /// current value when omitted. Returns `None` if no row exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMachine,
    ) -> Result<Option<Machine>, sqlx::Error> {
        let query = format!(
            "UPDATE machines SET
                name = $2,
                site_id = $3,
                desired_daily_hours = $4,
                status = COALESCE($5, status),
                machine_type = COALESCE($6, machine_type),
                next_maintenance_date = COALESCE($7, next_maintenance_date),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Machine>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.site_id)
            .bind(input.desired_daily_hours)
            .bind(&input.status)
            .bind(&input.machine_type)
            .bind(input.next_maintenance_date)
            .fetch_optional(pool)
            .await
    }

    /// Delete a machine. Returns `true` if a row was deleted.
    ///
    /// Operation logs and maintenance tasks cascade at the database.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM machines WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add operated hours to a machine's running total.
    pub async fn increment_total_hours(
        pool: &PgPool,
        id: DbId,
        hours: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE machines SET total_hours_run = total_hours_run + $2, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(hours)
        .execute(pool)
        .await?;
        Ok(())
    }
}
