//! Site entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use upkeep_core::types::{DbId, Timestamp};

/// A row from the `sites` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: DbId,
    pub name: String,
    pub location: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Site listing row with its machine count.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteWithMachineCount {
    pub id: DbId,
    pub name: String,
    pub location: String,
    pub machine_count: i64,
}

/// DTO for creating or updating a site. Both fields are required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInput {
    pub name: String,
    pub location: String,
}
