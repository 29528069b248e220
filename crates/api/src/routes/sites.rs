//! Route definitions for the `/sites` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::sites;
use crate::state::AppState;

/// Routes mounted at `/sites`.
///
/// ```text
/// GET    /      -> list (requires auth)
/// POST   /      -> create (admin only)
/// PUT    /{id}  -> update (admin only)
/// DELETE /{id}  -> delete (admin only, 409 while machines remain)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sites::list).post(sites::create))
        .route("/{id}", put(sites::update).delete(sites::delete))
}
