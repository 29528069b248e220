//! Maintenance task instance model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use upkeep_core::types::{DbId, Timestamp};

/// A row from the `maintenance_tasks` table.
///
/// `task_template_id` links instances generated from a template; manually
/// created tasks carry `None`.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceTask {
    pub id: DbId,
    pub machine_id: DbId,
    pub task: String,
    pub priority: String,
    pub frequency: String,
    pub completed: bool,
    pub completed_by: Option<String>,
    pub completed_date: Option<Timestamp>,
    pub task_template_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Task listing row joined with machine and site names.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceTaskWithMachine {
    pub id: DbId,
    pub machine_id: DbId,
    pub machine_name: String,
    pub site_name: String,
    pub task: String,
    pub priority: String,
    pub frequency: String,
    pub completed: bool,
    pub completed_by: Option<String>,
    pub completed_date: Option<Timestamp>,
    pub task_template_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for manually creating a task on a machine (no template linkage).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenanceTask {
    pub machine_id: DbId,
    pub task: String,
    pub priority: String,
    /// Defaults to `daily`.
    pub frequency: Option<String>,
}

/// DTO for updating a task. Only provided fields change; flipping
/// `completed` also sets or clears `completed_by`/`completed_date` (handled
/// in the api layer).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaintenanceTask {
    pub task: Option<String>,
    pub priority: Option<String>,
    pub completed: Option<bool>,
    pub completed_by: Option<String>,
}

/// Completion change applied by the repository together with field updates.
#[derive(Debug, Clone)]
pub struct CompletionChange {
    pub completed: bool,
    pub completed_by: Option<String>,
    pub completed_date: Option<Timestamp>,
}

/// Query filters for listing tasks.
///
/// `machine_id` takes precedence over `site_id`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceTaskQuery {
    pub machine_id: Option<DbId>,
    pub site_id: Option<DbId>,
    pub completed: Option<bool>,
}
