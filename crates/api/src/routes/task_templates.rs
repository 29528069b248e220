//! Route definitions for the `/task-templates` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::task_templates;
use crate::state::AppState;

/// Routes mounted at `/task-templates`.
///
/// ```text
/// GET    /      -> list (requires auth; ?machineType, ?frequency)
/// POST   /      -> create (admin only)
/// PUT    /{id}  -> update (admin only; reconciles the machine type)
/// DELETE /{id}  -> delete (admin only; cascades onto linked instances)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(task_templates::list).post(task_templates::create))
        .route(
            "/{id}",
            put(task_templates::update).delete(task_templates::delete),
        )
}
