//! Repository for the `maintenance_task_templates` table.

use sqlx::PgPool;
use upkeep_core::types::DbId;

use crate::models::task_template::{TaskTemplate, TaskTemplateInput, TaskTemplateQuery};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, task, priority, frequency, machine_type, description, \
                        created_at, updated_at";

/// Provides CRUD operations for maintenance task templates.
pub struct TaskTemplateRepo;

impl TaskTemplateRepo {
    /// Insert a new template, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &TaskTemplateInput,
    ) -> Result<TaskTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO maintenance_task_templates
                 (task, priority, frequency, machine_type, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaskTemplate>(&query)
            .bind(&input.task)
            .bind(&input.priority)
            .bind(&input.frequency)
            .bind(&input.machine_type)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a template by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TaskTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM maintenance_task_templates WHERE id = $1");
        sqlx::query_as::<_, TaskTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List templates with optional machine-type and frequency filters.
    ///
    /// Ordered by machine type, then frequency, then priority (high first).
    pub async fn query(
        pool: &PgPool,
        params: &TaskTemplateQuery,
    ) -> Result<Vec<TaskTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM maintenance_task_templates
             WHERE ($1::text IS NULL OR machine_type = $1)
               AND ($2::text IS NULL OR frequency = $2)
             ORDER BY machine_type, frequency,
                      CASE priority WHEN 'high' THEN 3 WHEN 'medium' THEN 2 ELSE 1 END DESC"
        );
        sqlx::query_as::<_, TaskTemplate>(&query)
            .bind(&params.machine_type)
            .bind(&params.frequency)
            .fetch_all(pool)
            .await
    }

    /// All templates tagged with one machine type (exact match).
    pub async fn list_by_machine_type(
        pool: &PgPool,
        machine_type: &str,
    ) -> Result<Vec<TaskTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM maintenance_task_templates
             WHERE machine_type = $1
             ORDER BY id"
        );
        sqlx::query_as::<_, TaskTemplate>(&query)
            .bind(machine_type)
            .fetch_all(pool)
            .await
    }

    /// Replace a template's fields.
    ///
    /// `description` keeps its current value when omitted. Returns `None`
    /// if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &TaskTemplateInput,
    ) -> Result<Option<TaskTemplate>, sqlx::Error> {
        let query = format!(
            "UPDATE maintenance_task_templates SET
                task = $2,
                priority = $3,
                frequency = $4,
                machine_type = $5,
                description = COALESCE($6, description),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaskTemplate>(&query)
            .bind(id)
            .bind(&input.task)
            .bind(&input.priority)
            .bind(&input.frequency)
            .bind(&input.machine_type)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a template by ID. Returns `true` if a row was deleted.
    ///
    /// Linked task instances are removed beforehand by the caller (the
    /// cascade is explicit so the count can be reported).
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM maintenance_task_templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
