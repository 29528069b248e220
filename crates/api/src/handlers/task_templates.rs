//! Handlers for the `/task-templates` resource.
//!
//! Template mutations drive the reconciler: an update re-synchronizes the
//! affected machine type (both types, when the edit moves the template), and
//! a delete cascades onto every instance the template generated.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use upkeep_core::error::CoreError;
use upkeep_core::maintenance::{validate_frequency, validate_priority, validate_task_text};
use upkeep_core::types::DbId;
use upkeep_db::models::task_template::{TaskTemplate, TaskTemplateInput, TaskTemplateQuery};
use upkeep_db::repositories::{MaintenanceTaskRepo, TaskTemplateRepo};

use crate::audit::{self, ClientInfo};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;
use crate::sync;

/// Response for `DELETE /task-templates/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTemplateResponse {
    pub message: String,
    pub tasks_deleted: i64,
}

/// GET /api/v1/task-templates
///
/// Templates with optional machine-type and frequency filters, ordered by
/// machine type, frequency, then priority (high first).
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<TaskTemplateQuery>,
) -> AppResult<Json<Vec<TaskTemplate>>> {
    let templates = TaskTemplateRepo::query(&state.pool, &params).await?;
    Ok(Json(templates))
}

/// POST /api/v1/task-templates
///
/// Create a template (admin only). Existing machines of the type pick the
/// template up on the next synchronize.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    client: ClientInfo,
    Json(input): Json<TaskTemplateInput>,
) -> AppResult<(StatusCode, Json<TaskTemplate>)> {
    validate_input(&input)?;

    let template = TaskTemplateRepo::create(&state.pool, &input).await?;

    audit::record(
        &state.pool,
        Some(admin.user_id),
        "CREATE_MAINTENANCE_TASK_TEMPLATE",
        "MaintenanceTaskTemplate",
        Some(template.id),
        Some(serde_json::json!({
            "task": template.task,
            "machineType": template.machine_type,
            "frequency": template.frequency,
            "priority": template.priority,
        })),
        &client,
    )
    .await;

    Ok((StatusCode::CREATED, Json(template)))
}

/// PUT /api/v1/task-templates/{id}
///
/// Replace a template's fields (admin only), then reconcile the affected
/// machine type. When the edit changes the template's machine type, its
/// instances are first cleared off every machine of the old type so the
/// move leaves nothing orphaned behind.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    client: ClientInfo,
    Path(id): Path<DbId>,
    Json(input): Json<TaskTemplateInput>,
) -> AppResult<Json<TaskTemplate>> {
    validate_input(&input)?;

    let original = TaskTemplateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "MaintenanceTaskTemplate",
            id,
        })?;

    let updated = TaskTemplateRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "MaintenanceTaskTemplate",
            id,
        })?;

    if original.machine_type != updated.machine_type {
        tracing::info!(
            template_id = id,
            from = %original.machine_type,
            to = %updated.machine_type,
            "Template moved between machine types"
        );
        sync::detach_template_from_machine_type(&state.pool, id, &original.machine_type).await?;
    }

    let summary = sync::synchronize_machine_type(&state.pool, &updated.machine_type).await?;

    audit::record(
        &state.pool,
        Some(admin.user_id),
        "UPDATE_MAINTENANCE_TASK_TEMPLATE",
        "MaintenanceTaskTemplate",
        Some(updated.id),
        Some(serde_json::json!({
            "templateTask": updated.task,
            "machineType": updated.machine_type,
            "machinesSynchronized": summary.machines_synchronized,
            "tasksRemoved": summary.tasks_removed,
            "tasksAdded": summary.tasks_added,
            "tasksUpdated": summary.tasks_updated,
        })),
        &client,
    )
    .await;

    Ok(Json(updated))
}

/// DELETE /api/v1/task-templates/{id}
///
/// Delete a template (admin only), cascading onto every instance it
/// generated and reporting the removed count.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    client: ClientInfo,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeleteTemplateResponse>> {
    let template = TaskTemplateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "MaintenanceTaskTemplate",
            id,
        })?;

    let tasks_deleted = MaintenanceTaskRepo::delete_by_template(&state.pool, id).await? as i64;
    TaskTemplateRepo::delete(&state.pool, id).await?;

    tracing::info!(template_id = id, tasks_deleted, "Deleted task template");

    audit::record(
        &state.pool,
        Some(admin.user_id),
        "DELETE_MAINTENANCE_TASK_TEMPLATE",
        "MaintenanceTaskTemplate",
        Some(id),
        Some(serde_json::json!({
            "task": template.task,
            "machineType": template.machine_type,
            "tasksDeleted": tasks_deleted,
        })),
        &client,
    )
    .await;

    Ok(Json(DeleteTemplateResponse {
        message: "Maintenance task template deleted successfully".to_string(),
        tasks_deleted,
    }))
}

/// All fields but `description` must be present and valid.
fn validate_input(input: &TaskTemplateInput) -> Result<(), CoreError> {
    validate_task_text(&input.task)?;
    validate_priority(&input.priority)?;
    validate_frequency(&input.frequency)?;
    if input.machine_type.trim().is_empty() {
        return Err(CoreError::Validation(
            "Machine type is required".to_string(),
        ));
    }
    Ok(())
}
