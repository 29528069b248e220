//! Route definitions for the `/maintenance-tasks` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::maintenance_tasks;
use crate::state::AppState;

/// Routes mounted at `/maintenance-tasks`.
///
/// ```text
/// GET    /      -> list (requires auth; ?machineId | ?siteId, ?completed)
/// POST   /      -> create (admin only)
/// PUT    /{id}  -> update (requires auth; completion flow)
/// DELETE /{id}  -> delete (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(maintenance_tasks::list).post(maintenance_tasks::create),
        )
        .route(
            "/{id}",
            put(maintenance_tasks::update).delete(maintenance_tasks::delete),
        )
}
