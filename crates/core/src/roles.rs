//! Role names and validation.
//!
//! Two roles exist: `admin` (full control, user management, all mutations)
//! and `engineer` (reads everything, records operation logs, completes
//! maintenance tasks).

use crate::error::CoreError;

/// Full administrative access.
pub const ROLE_ADMIN: &str = "admin";
/// Day-to-day operations: logs and task completion.
pub const ROLE_ENGINEER: &str = "engineer";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_ENGINEER];

/// Validate a role string coming from a registration request.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown role: '{role}'. Valid roles: {}",
            VALID_ROLES.join(", ")
        )))
    }
}
