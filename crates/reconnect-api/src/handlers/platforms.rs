//! Platform handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use reconnect_core::{Id, PermissionLevel};
use reconnect_db::{PlatformInput, PlatformRepository};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, CurrentUser};

/// GET /platforms
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let rows = PlatformRepository::new(state.db).list().await?;
    Ok(Json(rows))
}

/// GET /platforms/:id
pub async fn get(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let row = PlatformRepository::new(state.db)
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("platform", id))?;
    Ok(Json(row))
}

/// POST /platforms
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<PlatformInput>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    let row = PlatformRepository::new(state.db).create(input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /platforms/:id
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
    Json(input): Json<PlatformInput>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    let row = PlatformRepository::new(state.db).update(id, input).await?;
    Ok(Json(row))
}

/// DELETE /platforms/:id
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    PlatformRepository::new(state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
