//! Route definitions for the `/operation-logs` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::operation_logs;
use crate::state::AppState;

/// Routes mounted at `/operation-logs`.
///
/// ```text
/// GET  /  -> list (requires auth; ?machineId | ?siteId, ?startDate+?endDate)
/// POST /  -> create (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(operation_logs::list).post(operation_logs::create))
}
