//! Handlers for the `/operation-logs` resource.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use upkeep_core::error::CoreError;
use upkeep_db::models::operation_log::{
    CreateOperationLog, OperationLog, OperationLogQuery, OperationLogWithMachine,
};
use upkeep_db::repositories::{MachineRepo, OperationLogRepo};

use crate::audit::{self, ClientInfo};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/operation-logs
///
/// Logs joined with machine and site names, newest first. Filter by
/// machine, site, or a date range.
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<OperationLogQuery>,
) -> AppResult<Json<Vec<OperationLogWithMachine>>> {
    let logs = OperationLogRepo::query(&state.pool, &params).await?;
    Ok(Json(logs))
}

/// POST /api/v1/operation-logs
///
/// Record a day's operation for a machine (any authenticated user). The
/// operated hours are added to the machine's running total.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    client: ClientInfo,
    Json(input): Json<CreateOperationLog>,
) -> AppResult<(StatusCode, Json<OperationLog>)> {
    if input.start_time.trim().is_empty()
        || input.end_time.trim().is_empty()
        || input.engineer.trim().is_empty()
        || input.operator.trim().is_empty()
    {
        return Err(CoreError::Validation(
            "Date, times, engineer, and operator are required".to_string(),
        )
        .into());
    }

    let machine = MachineRepo::find_by_id(&state.pool, input.machine_id)
        .await?
        .ok_or_else(|| CoreError::Validation("Invalid machine ID".to_string()))?;

    let log = OperationLogRepo::create(&state.pool, &input).await?;

    let hours = input.total_hours.unwrap_or(0);
    if hours > 0 {
        MachineRepo::increment_total_hours(&state.pool, machine.id, hours).await?;
    }

    audit::record(
        &state.pool,
        Some(auth.user_id),
        "CREATE_OPERATION_LOG",
        "OperationLog",
        Some(log.id),
        Some(serde_json::json!({
            "machineName": machine.name,
            "totalHours": log.total_hours,
            "date": log.date,
        })),
        &client,
    )
    .await;

    Ok((StatusCode::CREATED, Json(log)))
}
