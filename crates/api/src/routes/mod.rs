pub mod auth;
pub mod health;
pub mod machine_types;
pub mod machines;
pub mod maintenance_tasks;
pub mod operation_logs;
pub mod sites;
pub mod task_templates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/check-initialization                       initialization probe (public)
/// /auth/setup                                      first-run admin setup (public)
/// /auth/login                                      login (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/register                                   create user (admin only)
/// /auth/profile                                    own profile (requires auth)
/// /auth/validate-token                             token check (public)
/// /auth/sessions                                   active sessions (admin only)
/// /auth/audit-logs                                 audit trail (admin only)
///
/// /sites                                           list, create
/// /sites/{id}                                      update, delete (guarded)
///
/// /machines                                        list, create
/// /machines/{id}                                   update, delete
/// /machines/{id}/apply-task-templates              instantiate templates (POST)
///
/// /machine-types                                   distinct types (GET)
/// /machine-types/{machine_type}/synchronize        reconcile type (POST)
///
/// /operation-logs                                  list, create
///
/// /maintenance-tasks                               list, create
/// /maintenance-tasks/{id}                          update (completion), delete
///
/// /task-templates                                  list, create
/// /task-templates/{id}                             update (reconciles), delete (cascades)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication, sessions, and the audit trail.
        .nest("/auth", auth::router())
        // Sites and the machines installed at them.
        .nest("/sites", sites::router())
        .nest("/machines", machines::router())
        // Machine-type listing and the manual synchronize action.
        .nest("/machine-types", machine_types::router())
        // Daily operation logs.
        .nest("/operation-logs", operation_logs::router())
        // Per-machine maintenance task instances.
        .nest("/maintenance-tasks", maintenance_tasks::router())
        // Task templates; mutations drive the reconciler.
        .nest("/task-templates", task_templates::router())
}
