//! Request handlers.
//!
//! Each submodule provides async handler functions for a single resource.
//! Handlers delegate to the repositories in `upkeep_db` and map errors via
//! [`crate::error::AppError`].

pub mod auth;
pub mod machine_types;
pub mod machines;
pub mod maintenance_tasks;
pub mod operation_logs;
pub mod sites;
pub mod task_templates;

use serde::Serialize;

/// Standard `{ "message": ... }` response body for delete-style endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
