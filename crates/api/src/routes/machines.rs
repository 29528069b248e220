//! Route definitions for the `/machines` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::machines;
use crate::state::AppState;

/// Routes mounted at `/machines`.
///
/// ```text
/// GET    /                           -> list (requires auth)
/// POST   /                           -> create (admin only)
/// PUT    /{id}                       -> update (admin only)
/// DELETE /{id}                       -> delete (admin only)
/// POST   /{id}/apply-task-templates  -> apply_task_templates (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(machines::list).post(machines::create))
        .route("/{id}", put(machines::update).delete(machines::delete))
        .route(
            "/{id}/apply-task-templates",
            post(machines::apply_task_templates),
        )
}
