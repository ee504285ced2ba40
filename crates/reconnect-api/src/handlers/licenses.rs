//! License handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use reconnect_core::{Id, PermissionLevel};
use reconnect_db::{LicenseInput, LicenseRepository};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, CurrentUser};
use crate::handlers::AssignmentBody;

/// GET /licenses
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let rows = LicenseRepository::new(state.db).list().await?;
    Ok(Json(rows))
}

/// GET /licenses/:id
pub async fn get(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let row = LicenseRepository::new(state.db)
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("license", id))?;
    Ok(Json(row))
}

/// POST /licenses
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<LicenseInput>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    let row = LicenseRepository::new(state.db).create(input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /licenses/:id
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
    Json(input): Json<LicenseInput>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    let row = LicenseRepository::new(state.db).update(id, input).await?;
    Ok(Json(row))
}

/// DELETE /licenses/:id
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    LicenseRepository::new(state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /licenses/:id/assignments
pub async fn assignments(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let repo = LicenseRepository::new(state.db);
    require_license(&repo, id).await?;
    let rows = repo.assignments(id).await?;
    Ok(Json(rows))
}

/// PUT /licenses/:id/assignments
///
/// Moves the license: the previous assignment (if any) is replaced.
pub async fn assign(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
    Json(body): Json<AssignmentBody>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    let target = body.target()?;
    let repo = LicenseRepository::new(state.db);
    require_license(&repo, id).await?;
    let row = repo.assign(id, target).await?;
    Ok(Json(row))
}

/// DELETE /licenses/:id/assignments/:assignment_id
pub async fn unassign(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((id, assignment_id)): Path<(Id, Id)>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    LicenseRepository::new(state.db)
        .unassign(id, assignment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn require_license(repo: &LicenseRepository, id: Id) -> Result<(), ApiError> {
    repo.find_by_id(id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::not_found("license", id))
}
