//! Repository for the `maintenance_tasks` table.
//!
//! Besides plain CRUD this carries the store-side primitives the template
//! reconciler is built from: bulk delete by id, instantiate-from-template,
//! refresh-from-template, and the template-scoped deletes used by cascade
//! delete and machine-type moves.

use sqlx::PgPool;
use upkeep_core::maintenance::DEFAULT_FREQUENCY;
use upkeep_core::types::DbId;

use crate::models::maintenance_task::{
    CompletionChange, CreateMaintenanceTask, MaintenanceTask, MaintenanceTaskQuery,
    MaintenanceTaskWithMachine,
};
use crate::models::task_template::TaskTemplate;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, machine_id, task, priority, frequency, completed, \
                        completed_by, completed_date, task_template_id, \
                        created_at, updated_at";

/// Provides CRUD and reconciliation primitives for maintenance tasks.
pub struct MaintenanceTaskRepo;

impl MaintenanceTaskRepo {
    /// Insert a manually created task (no template linkage).
    pub async fn create(
        pool: &PgPool,
        input: &CreateMaintenanceTask,
    ) -> Result<MaintenanceTask, sqlx::Error> {
        let query = format!(
            "INSERT INTO maintenance_tasks (machine_id, task, priority, frequency)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MaintenanceTask>(&query)
            .bind(input.machine_id)
            .bind(&input.task)
            .bind(&input.priority)
            .bind(input.frequency.as_deref().unwrap_or(DEFAULT_FREQUENCY))
            .fetch_one(pool)
            .await
    }

    /// Instantiate a template on a machine: copies task text, priority, and
    /// frequency, links via `task_template_id`, starts incomplete.
    pub async fn create_from_template(
        pool: &PgPool,
        machine_id: DbId,
        template: &TaskTemplate,
    ) -> Result<MaintenanceTask, sqlx::Error> {
        let query = format!(
            "INSERT INTO maintenance_tasks
                 (machine_id, task, priority, frequency, task_template_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MaintenanceTask>(&query)
            .bind(machine_id)
            .bind(&template.task)
            .bind(&template.priority)
            .bind(&template.frequency)
            .bind(template.id)
            .fetch_one(pool)
            .await
    }

    /// Find a task by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MaintenanceTask>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM maintenance_tasks WHERE id = $1");
        sqlx::query_as::<_, MaintenanceTask>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All tasks on one machine, oldest first.
    pub async fn list_by_machine(
        pool: &PgPool,
        machine_id: DbId,
    ) -> Result<Vec<MaintenanceTask>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM maintenance_tasks WHERE machine_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, MaintenanceTask>(&query)
            .bind(machine_id)
            .fetch_all(pool)
            .await
    }

    /// Number of tasks on one machine.
    pub async fn count_for_machine(pool: &PgPool, machine_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM maintenance_tasks WHERE machine_id = $1")
            .bind(machine_id)
            .fetch_one(pool)
            .await
    }

    /// List tasks joined with machine and site names: highest priority first,
    /// incomplete before completed.
    ///
    /// `machine_id` takes precedence over `site_id`.
    pub async fn query(
        pool: &PgPool,
        params: &MaintenanceTaskQuery,
    ) -> Result<Vec<MaintenanceTaskWithMachine>, sqlx::Error> {
        let (machine_filter, site_filter) = match (params.machine_id, params.site_id) {
            (Some(machine_id), _) => (Some(machine_id), None),
            (None, Some(site_id)) => (None, Some(site_id)),
            (None, None) => (None, None),
        };

        sqlx::query_as::<_, MaintenanceTaskWithMachine>(
            "SELECT t.id, t.machine_id, m.name AS machine_name, s.name AS site_name, \
                    t.task, t.priority, t.frequency, t.completed, t.completed_by, \
                    t.completed_date, t.task_template_id, t.created_at, t.updated_at \
             FROM maintenance_tasks t \
             JOIN machines m ON m.id = t.machine_id \
             JOIN sites s ON s.id = m.site_id \
             WHERE ($1::bigint IS NULL OR t.machine_id = $1) \
               AND ($2::bigint IS NULL OR m.site_id = $2) \
               AND ($3::boolean IS NULL OR t.completed = $3) \
             ORDER BY CASE t.priority WHEN 'high' THEN 3 WHEN 'medium' THEN 2 ELSE 1 END DESC, \
                      t.completed",
        )
            .bind(machine_filter)
            .bind(site_filter)
            .bind(params.completed)
            .fetch_all(pool)
            .await
    }

    /// Update a task's text/priority and optionally its completion state.
    ///
    /// `task` and `priority` keep their current value when `None`. When
    /// `completion` is present, all three completion columns are replaced
    /// together (clearing `completed_by`/`completed_date` on un-complete).
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        task: Option<&str>,
        priority: Option<&str>,
        completion: Option<&CompletionChange>,
    ) -> Result<Option<MaintenanceTask>, sqlx::Error> {
        let query = format!(
            "UPDATE maintenance_tasks SET
                task = COALESCE($2, task),
                priority = COALESCE($3, priority),
                completed = CASE WHEN $4::boolean IS NULL THEN completed ELSE $4 END,
                completed_by = CASE WHEN $4::boolean IS NULL THEN completed_by ELSE $5 END,
                completed_date = CASE WHEN $4::boolean IS NULL THEN completed_date ELSE $6 END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MaintenanceTask>(&query)
            .bind(id)
            .bind(task)
            .bind(priority)
            .bind(completion.map(|c| c.completed))
            .bind(completion.and_then(|c| c.completed_by.as_deref()))
            .bind(completion.and_then(|c| c.completed_date))
            .fetch_optional(pool)
            .await
    }

    /// Push a template's task text, priority, and frequency onto a linked
    /// instance. Returns `true` if the row was updated.
    pub async fn refresh_from_template(
        pool: &PgPool,
        id: DbId,
        template: &TaskTemplate,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE maintenance_tasks
             SET task = $2, priority = $3, frequency = $4, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&template.task)
        .bind(&template.priority)
        .bind(&template.frequency)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a task by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM maintenance_tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a batch of tasks by ID, returning the number removed.
    ///
    /// Ids that no longer exist are skipped silently, which makes a lost
    /// race between two synchronize calls harmless.
    pub async fn delete_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM maintenance_tasks WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete every instance generated from a template, returning the count.
    /// Used by the template cascade delete.
    pub async fn delete_by_template(pool: &PgPool, template_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM maintenance_tasks WHERE task_template_id = $1")
            .bind(template_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete instances generated from a template on machines of one type,
    /// returning the count. Used when a template moves between machine types
    /// to clear its instances off the type it left.
    pub async fn delete_by_template_and_machine_type(
        pool: &PgPool,
        template_id: DbId,
        machine_type: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM maintenance_tasks t
             USING machines m
             WHERE t.machine_id = m.id
               AND t.task_template_id = $1
               AND m.machine_type = $2",
        )
        .bind(template_id)
        .bind(machine_type)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
