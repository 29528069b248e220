//! Handlers for machine types: the distinct-type listing and the manual
//! synchronize action that reconciles every machine of a type against the
//! type's template set.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use upkeep_core::sync::SyncSummary;
use upkeep_db::repositories::MachineRepo;

use crate::audit::{self, ClientInfo};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;
use crate::sync;

/// Response for `POST /machine-types/{machine_type}/synchronize`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynchronizeResponse {
    pub message: String,
    #[serde(flatten)]
    pub summary: SyncSummary,
}

/// GET /api/v1/machine-types
///
/// Distinct non-blank machine types, sorted ascending.
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<String>>> {
    let types = MachineRepo::distinct_machine_types(&state.pool).await?;
    Ok(Json(types))
}

/// POST /api/v1/machine-types/{machine_type}/synchronize
///
/// Reconcile every machine of the type against its current template set
/// (admin only). A type with no machines or no templates is a no-op that
/// still succeeds with zero counts.
pub async fn synchronize(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    client: ClientInfo,
    Path(machine_type): Path<String>,
) -> AppResult<Json<SynchronizeResponse>> {
    let summary = sync::synchronize_machine_type(&state.pool, &machine_type).await?;

    audit::record(
        &state.pool,
        Some(admin.user_id),
        "SYNCHRONIZE_MACHINE_TYPE",
        "MaintenanceTask",
        None,
        Some(serde_json::json!({
            "machineType": machine_type,
            "machinesSynchronized": summary.machines_synchronized,
            "tasksRemoved": summary.tasks_removed,
            "tasksAdded": summary.tasks_added,
            "tasksUpdated": summary.tasks_updated,
        })),
        &client,
    )
    .await;

    let message = format!(
        "Synchronized {} machines of type {machine_type}",
        summary.machines_synchronized
    );
    Ok(Json(SynchronizeResponse { message, summary }))
}
