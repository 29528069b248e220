//! Operation log entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use upkeep_core::types::{DbId, Timestamp};

/// A row from the `operation_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationLog {
    pub id: DbId,
    pub machine_id: DbId,
    pub date: Timestamp,
    pub start_time: String,
    pub end_time: String,
    pub total_hours: i32,
    pub engineer: String,
    pub operator: String,
    pub not_operated_reason: Option<String>,
    pub maintenance_checklist_completed: bool,
    pub created_at: Timestamp,
}

/// Operation log listing row joined with machine and site names.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationLogWithMachine {
    pub id: DbId,
    pub machine_id: DbId,
    pub machine_name: String,
    pub site_name: String,
    pub date: Timestamp,
    pub start_time: String,
    pub end_time: String,
    pub total_hours: i32,
    pub engineer: String,
    pub operator: String,
    pub not_operated_reason: Option<String>,
    pub maintenance_checklist_completed: bool,
    pub created_at: Timestamp,
}

/// DTO for recording an operation log.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOperationLog {
    pub machine_id: DbId,
    pub date: Timestamp,
    pub start_time: String,
    pub end_time: String,
    /// Defaults to 0 when omitted.
    pub total_hours: Option<i32>,
    pub engineer: String,
    pub operator: String,
    pub not_operated_reason: Option<String>,
    #[serde(default)]
    pub maintenance_checklist_completed: bool,
}

/// Query filters for listing operation logs.
///
/// `machine_id` takes precedence over `site_id`; the date bounds apply only
/// when both are present.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationLogQuery {
    pub machine_id: Option<DbId>,
    pub site_id: Option<DbId>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}
