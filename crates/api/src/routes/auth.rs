//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// GET  /check-initialization -> check_initialization (public)
/// POST /setup                -> setup (public, 403 once initialized)
/// POST /login                -> login (public)
/// POST /logout               -> logout (requires auth)
/// POST /register             -> register (admin; public only at bootstrap)
/// GET  /profile              -> profile (requires auth)
/// GET  /validate-token       -> validate (public)
/// GET  /sessions             -> sessions (admin only)
/// GET  /audit-logs           -> audit_logs (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/check-initialization", get(auth::check_initialization))
        .route("/setup", post(auth::setup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/register", post(auth::register))
        .route("/profile", get(auth::profile))
        .route("/validate-token", get(auth::validate))
        .route("/sessions", get(auth::sessions))
        .route("/audit-logs", get(auth::audit_logs))
}
