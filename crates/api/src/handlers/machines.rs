//! Handlers for the `/machines` resource, including the apply-templates
//! action.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use upkeep_core::error::CoreError;
use upkeep_core::types::DbId;
use upkeep_db::models::machine::{CreateMachine, Machine, MachineWithSite, UpdateMachine};
use upkeep_db::models::maintenance_task::MaintenanceTask;
use upkeep_db::repositories::{MachineRepo, MaintenanceTaskRepo, SiteRepo, TaskTemplateRepo};

use crate::audit::{self, ClientInfo};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Response for `POST /machines/{id}/apply-task-templates`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyTemplatesResponse {
    pub message: String,
    pub tasks: Vec<MaintenanceTask>,
}

/// GET /api/v1/machines
///
/// All machines joined with their site names, ordered by name.
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<MachineWithSite>>> {
    let machines = MachineRepo::list_with_site(&state.pool).await?;
    Ok(Json(machines))
}

/// POST /api/v1/machines
///
/// Create a machine (admin only). The site must exist.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    client: ClientInfo,
    Json(input): Json<CreateMachine>,
) -> AppResult<(StatusCode, Json<Machine>)> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Name is required".to_string()).into());
    }
    let site = require_site(&state, input.site_id).await?;

    let machine = MachineRepo::create(&state.pool, &input).await?;

    audit::record(
        &state.pool,
        Some(admin.user_id),
        "CREATE_MACHINE",
        "Machine",
        Some(machine.id),
        Some(serde_json::json!({
            "machineName": machine.name,
            "siteName": site.name,
            "status": machine.status,
        })),
        &client,
    )
    .await;

    Ok((StatusCode::CREATED, Json(machine)))
}

/// PUT /api/v1/machines/{id}
///
/// Replace a machine's editable fields (admin only). The site must exist.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    client: ClientInfo,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMachine>,
) -> AppResult<Json<Machine>> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Name is required".to_string()).into());
    }
    let site = require_site(&state, input.site_id).await?;

    let machine = MachineRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Machine",
            id,
        })?;

    audit::record(
        &state.pool,
        Some(admin.user_id),
        "UPDATE_MACHINE",
        "Machine",
        Some(machine.id),
        Some(serde_json::json!({
            "machineName": machine.name,
            "siteName": site.name,
            "status": machine.status,
        })),
        &client,
    )
    .await;

    Ok(Json(machine))
}

/// DELETE /api/v1/machines/{id}
///
/// Delete a machine (admin only). Its logs and tasks cascade.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    client: ClientInfo,
    Path(id): Path<DbId>,
) -> AppResult<Json<super::MessageResponse>> {
    let machine = MachineRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Machine",
            id,
        })?;

    MachineRepo::delete(&state.pool, id).await?;

    audit::record(
        &state.pool,
        Some(admin.user_id),
        "DELETE_MACHINE",
        "Machine",
        Some(id),
        Some(serde_json::json!({ "machineName": machine.name })),
        &client,
    )
    .await;

    Ok(Json(super::MessageResponse {
        message: "Machine deleted successfully".to_string(),
    }))
}

/// POST /api/v1/machines/{id}/apply-task-templates
///
/// Instantiate every template of the machine's type on the machine (admin
/// only). Conflicts if the machine already has any task instances; those
/// must be cleared manually first.
pub async fn apply_task_templates(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    client: ClientInfo,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<ApplyTemplatesResponse>)> {
    let machine = MachineRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Machine",
            id,
        })?;

    let templates =
        TaskTemplateRepo::list_by_machine_type(&state.pool, &machine.machine_type).await?;
    if templates.is_empty() {
        return Err(AppError::NotFound(
            "No task templates found for this machine type".to_string(),
        ));
    }

    let existing = MaintenanceTaskRepo::count_for_machine(&state.pool, id).await?;
    if existing > 0 {
        return Err(CoreError::Conflict(
            "Tasks already exist for this machine. Delete existing tasks first.".to_string(),
        )
        .into());
    }

    let mut tasks = Vec::with_capacity(templates.len());
    for template in &templates {
        tasks.push(MaintenanceTaskRepo::create_from_template(&state.pool, id, template).await?);
    }

    audit::record(
        &state.pool,
        Some(admin.user_id),
        "APPLY_TASK_TEMPLATES",
        "Machine",
        Some(id),
        Some(serde_json::json!({
            "machineName": machine.name,
            "machineType": machine.machine_type,
            "tasksApplied": tasks.len(),
        })),
        &client,
    )
    .await;

    let message = format!("Applied {} task templates to machine", tasks.len());
    Ok((
        StatusCode::CREATED,
        Json(ApplyTemplatesResponse { message, tasks }),
    ))
}

/// Look up a site referenced from a machine payload; a dangling id is a
/// validation error (400), not a 404, matching the form semantics.
async fn require_site(
    state: &AppState,
    site_id: DbId,
) -> AppResult<upkeep_db::models::site::Site> {
    SiteRepo::find_by_id(&state.pool, site_id)
        .await?
        .ok_or_else(|| CoreError::Validation("Invalid site ID".to_string()).into())
}
