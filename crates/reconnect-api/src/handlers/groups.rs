//! User group handlers
//!
//! Mutation requires the Admin level; reading requires Read.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use reconnect_core::{Id, PermissionLevel};
use reconnect_db::{GroupInput, GroupRepository};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, CurrentUser};

/// GET /groups
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let rows = GroupRepository::new(state.db).list().await?;
    Ok(Json(rows))
}

/// GET /groups/:id
pub async fn get(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let row = GroupRepository::new(state.db)
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("group", id))?;
    Ok(Json(row))
}

/// POST /groups
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<GroupInput>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Admin)?;
    let row = GroupRepository::new(state.db).create(input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /groups/:id
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
    Json(input): Json<GroupInput>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Admin)?;
    let row = GroupRepository::new(state.db).update(id, input).await?;
    Ok(Json(row))
}

/// DELETE /groups/:id
///
/// Member users are detached, not deleted.
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Admin)?;
    GroupRepository::new(state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
