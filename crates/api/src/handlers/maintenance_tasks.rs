//! Handlers for the `/maintenance-tasks` resource.
//!
//! Manual task creation gets no template linkage; such tasks are purged by
//! the next synchronize run unless their text matches a template.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use upkeep_core::error::CoreError;
use upkeep_core::maintenance::{validate_frequency, validate_priority, validate_task_text};
use upkeep_core::types::DbId;
use upkeep_db::models::maintenance_task::{
    CompletionChange, CreateMaintenanceTask, MaintenanceTask, MaintenanceTaskQuery,
    MaintenanceTaskWithMachine, UpdateMaintenanceTask,
};
use upkeep_db::repositories::{MachineRepo, MaintenanceTaskRepo, UserRepo};

use crate::audit::{self, ClientInfo};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /api/v1/maintenance-tasks
///
/// Tasks joined with machine and site names: highest priority first,
/// incomplete before completed. Filter by machine, site, or completion.
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<MaintenanceTaskQuery>,
) -> AppResult<Json<Vec<MaintenanceTaskWithMachine>>> {
    let tasks = MaintenanceTaskRepo::query(&state.pool, &params).await?;
    Ok(Json(tasks))
}

/// POST /api/v1/maintenance-tasks
///
/// Manually create a task on a machine (admin only, no template linkage).
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    client: ClientInfo,
    Json(input): Json<CreateMaintenanceTask>,
) -> AppResult<(StatusCode, Json<MaintenanceTask>)> {
    validate_task_text(&input.task)?;
    validate_priority(&input.priority)?;
    if let Some(frequency) = &input.frequency {
        validate_frequency(frequency)?;
    }

    let machine = MachineRepo::find_by_id(&state.pool, input.machine_id)
        .await?
        .ok_or_else(|| CoreError::Validation("Invalid machine ID".to_string()))?;

    let task = MaintenanceTaskRepo::create(&state.pool, &input).await?;

    audit::record(
        &state.pool,
        Some(admin.user_id),
        "CREATE_MAINTENANCE_TASK",
        "MaintenanceTask",
        Some(task.id),
        Some(serde_json::json!({
            "machineName": machine.name,
            "task": task.task,
            "priority": task.priority,
        })),
        &client,
    )
    .await;

    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /api/v1/maintenance-tasks/{id}
///
/// Update a task (any authenticated user). Completing a task stamps
/// `completedBy` (defaulting to the caller's name) and `completedDate`;
/// un-completing clears both.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    client: ClientInfo,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMaintenanceTask>,
) -> AppResult<Json<MaintenanceTask>> {
    if let Some(task) = &input.task {
        validate_task_text(task)?;
    }
    if let Some(priority) = &input.priority {
        validate_priority(priority)?;
    }

    let completion = match input.completed {
        Some(true) => {
            let completed_by = match input.completed_by {
                Some(name) => name,
                None => caller_name(&state, auth.user_id).await?,
            };
            Some(CompletionChange {
                completed: true,
                completed_by: Some(completed_by),
                completed_date: Some(Utc::now()),
            })
        }
        Some(false) => Some(CompletionChange {
            completed: false,
            completed_by: None,
            completed_date: None,
        }),
        None => None,
    };

    let task = MaintenanceTaskRepo::update(
        &state.pool,
        id,
        input.task.as_deref(),
        input.priority.as_deref(),
        completion.as_ref(),
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "MaintenanceTask",
        id,
    })?;

    audit::record(
        &state.pool,
        Some(auth.user_id),
        "UPDATE_MAINTENANCE_TASK",
        "MaintenanceTask",
        Some(task.id),
        Some(serde_json::json!({
            "task": task.task,
            "completed": task.completed,
            "completedBy": task.completed_by,
        })),
        &client,
    )
    .await;

    Ok(Json(task))
}

/// DELETE /api/v1/maintenance-tasks/{id}
///
/// Delete a task (admin only).
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    client: ClientInfo,
    Path(id): Path<DbId>,
) -> AppResult<Json<super::MessageResponse>> {
    let task = MaintenanceTaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "MaintenanceTask",
            id,
        })?;

    MaintenanceTaskRepo::delete(&state.pool, id).await?;

    audit::record(
        &state.pool,
        Some(admin.user_id),
        "DELETE_MAINTENANCE_TASK",
        "MaintenanceTask",
        Some(id),
        Some(serde_json::json!({ "task": task.task })),
        &client,
    )
    .await;

    Ok(Json(super::MessageResponse {
        message: "Maintenance task deleted successfully".to_string(),
    }))
}

/// The caller's display name, used as the default `completedBy` stamp.
async fn caller_name(state: &AppState, user_id: DbId) -> AppResult<String> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })?;
    Ok(user.name)
}
