//! Machine entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use upkeep_core::types::{DbId, Timestamp};

/// A row from the `machines` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub id: DbId,
    pub name: String,
    pub site_id: DbId,
    pub machine_type: String,
    pub status: String,
    pub desired_daily_hours: i32,
    pub total_hours_run: i32,
    pub last_maintenance_date: Timestamp,
    pub next_maintenance_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Machine listing row joined with its site name.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineWithSite {
    pub id: DbId,
    pub name: String,
    pub site_id: DbId,
    pub site_name: String,
    pub machine_type: String,
    pub status: String,
    pub desired_daily_hours: i32,
    pub total_hours_run: i32,
    pub last_maintenance_date: Timestamp,
    pub next_maintenance_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a machine.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMachine {
    pub name: String,
    pub site_id: DbId,
    pub desired_daily_hours: i32,
    /// Defaults to `operational`.
    pub status: Option<String>,
    /// Defaults to `general`.
    pub machine_type: Option<String>,
    /// Defaults to 30 days from creation.
    pub next_maintenance_date: Option<Timestamp>,
}

/// DTO for updating a machine. Name, site, and daily hours are required on
/// update (full-replace semantics, matching the edit form).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMachine {
    pub name: String,
    pub site_id: DbId,
    pub desired_daily_hours: i32,
    pub status: Option<String>,
    pub machine_type: Option<String>,
    pub next_maintenance_date: Option<Timestamp>,
}
