//! Maintenance task template model and DTOs.
//!
//! Within one machine type the `task` text acts as the de-facto natural key:
//! the reconciler matches instances to templates by text, falling back to
//! the id linkage only for in-place refreshes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use upkeep_core::types::{DbId, Timestamp};

/// A row from the `maintenance_task_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplate {
    pub id: DbId,
    pub task: String,
    pub priority: String,
    pub frequency: String,
    pub machine_type: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing a template. All fields but `description`
/// are required (full-replace semantics, matching the edit form).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplateInput {
    pub task: String,
    pub priority: String,
    pub frequency: String,
    pub machine_type: String,
    pub description: Option<String>,
}

/// Query filters for listing templates.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplateQuery {
    pub machine_type: Option<String>,
    pub frequency: Option<String>,
}
