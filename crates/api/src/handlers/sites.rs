//! Handlers for the `/sites` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use upkeep_core::error::CoreError;
use upkeep_core::types::DbId;
use upkeep_db::models::site::{Site, SiteInput, SiteWithMachineCount};
use upkeep_db::repositories::SiteRepo;

use crate::audit::{self, ClientInfo};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /api/v1/sites
///
/// All sites with their machine counts.
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<SiteWithMachineCount>>> {
    let sites = SiteRepo::list_with_machine_counts(&state.pool).await?;
    Ok(Json(sites))
}

/// POST /api/v1/sites
///
/// Create a site (admin only).
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    client: ClientInfo,
    Json(input): Json<SiteInput>,
) -> AppResult<(StatusCode, Json<Site>)> {
    validate_input(&input)?;

    let site = SiteRepo::create(&state.pool, &input).await?;

    audit::record(
        &state.pool,
        Some(admin.user_id),
        "CREATE_SITE",
        "Site",
        Some(site.id),
        Some(serde_json::json!({ "siteName": site.name, "location": site.location })),
        &client,
    )
    .await;

    Ok((StatusCode::CREATED, Json(site)))
}

/// PUT /api/v1/sites/{id}
///
/// Replace a site's name and location (admin only).
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    client: ClientInfo,
    Path(id): Path<DbId>,
    Json(input): Json<SiteInput>,
) -> AppResult<Json<Site>> {
    validate_input(&input)?;

    let site = SiteRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "Site", id })?;

    audit::record(
        &state.pool,
        Some(admin.user_id),
        "UPDATE_SITE",
        "Site",
        Some(site.id),
        Some(serde_json::json!({ "siteName": site.name, "location": site.location })),
        &client,
    )
    .await;

    Ok(Json(site))
}

/// DELETE /api/v1/sites/{id}
///
/// Delete a site (admin only). Refused with 409 while machines remain.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    client: ClientInfo,
    Path(id): Path<DbId>,
) -> AppResult<Json<super::MessageResponse>> {
    let site = SiteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Site", id })?;

    let machine_count = SiteRepo::machine_count(&state.pool, id).await?;
    if machine_count > 0 {
        return Err(CoreError::Conflict(
            "Cannot delete site with machines. Please remove all machines first.".to_string(),
        )
        .into());
    }

    SiteRepo::delete(&state.pool, id).await?;

    audit::record(
        &state.pool,
        Some(admin.user_id),
        "DELETE_SITE",
        "Site",
        Some(id),
        Some(serde_json::json!({ "siteName": site.name, "location": site.location })),
        &client,
    )
    .await;

    Ok(Json(super::MessageResponse {
        message: "Site deleted successfully".to_string(),
    }))
}

/// Both fields must be non-blank.
fn validate_input(input: &SiteInput) -> Result<(), CoreError> {
    if input.name.trim().is_empty() || input.location.trim().is_empty() {
        return Err(CoreError::Validation(
            "Name and location are required".to_string(),
        ));
    }
    Ok(())
}
