//! Route definitions for machine types and type synchronization.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::machine_types;
use crate::state::AppState;

/// Routes mounted at `/machine-types`.
///
/// ```text
/// GET  /                              -> list (requires auth)
/// POST /{machine_type}/synchronize    -> synchronize (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(machine_types::list))
        .route(
            "/{machine_type}/synchronize",
            post(machine_types::synchronize),
        )
}
