//! Software handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use reconnect_core::{Id, PermissionLevel};
use reconnect_db::{SoftwareInput, SoftwareRepository};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, CurrentUser};
use crate::handlers::AssignmentBody;

/// GET /software
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let rows = SoftwareRepository::new(state.db).list().await?;
    Ok(Json(rows))
}

/// GET /software/:id
pub async fn get(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let row = SoftwareRepository::new(state.db)
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("software", id))?;
    Ok(Json(row))
}

/// POST /software
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<SoftwareInput>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    let row = SoftwareRepository::new(state.db).create(input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /software/:id
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
    Json(input): Json<SoftwareInput>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    let row = SoftwareRepository::new(state.db).update(id, input).await?;
    Ok(Json(row))
}

/// DELETE /software/:id
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    SoftwareRepository::new(state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /software/:id/assignments
pub async fn assignments(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let repo = SoftwareRepository::new(state.db);
    require_software(&repo, id).await?;
    let rows = repo.assignments(id).await?;
    Ok(Json(rows))
}

/// POST /software/:id/assignments
///
/// Records one more installation; existing assignments are kept.
pub async fn add_assignment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
    Json(body): Json<AssignmentBody>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    let target = body.target()?;
    let repo = SoftwareRepository::new(state.db);
    require_software(&repo, id).await?;
    let row = repo.add_assignment(id, target).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// DELETE /software/:id/assignments/:assignment_id
pub async fn remove_assignment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((id, assignment_id)): Path<(Id, Id)>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    SoftwareRepository::new(state.db)
        .remove_assignment(id, assignment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn require_software(repo: &SoftwareRepository, id: Id) -> Result<(), ApiError> {
    repo.find_by_id(id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::not_found("software", id))
}
