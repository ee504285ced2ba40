//! Project handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use reconnect_core::{Id, PermissionLevel};
use reconnect_db::{ProjectInput, ProjectRepository};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, CurrentUser};

/// GET /projects
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let rows = ProjectRepository::new(state.db).list().await?;
    Ok(Json(rows))
}

/// GET /projects/:id
pub async fn get(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let row = ProjectRepository::new(state.db)
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("project", id))?;
    Ok(Json(row))
}

/// POST /projects
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<ProjectInput>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    let row = ProjectRepository::new(state.db).create(input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /projects/:id
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
    Json(input): Json<ProjectInput>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    let row = ProjectRepository::new(state.db).update(id, input).await?;
    Ok(Json(row))
}

/// DELETE /projects/:id
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    ProjectRepository::new(state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
