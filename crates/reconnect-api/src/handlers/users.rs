//! User administration handlers
//!
//! Mutation requires the Admin level; reading the directory requires Read.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use reconnect_core::{Id, PermissionLevel};
use reconnect_db::{UserInput, UserRepository};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, CurrentUser};

/// GET /users
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let rows = UserRepository::new(state.db).list().await?;
    Ok(Json(rows))
}

/// GET /users/:id
pub async fn get(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let row = UserRepository::new(state.db)
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("user", id))?;
    Ok(Json(row))
}

/// POST /users
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<UserInput>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Admin)?;
    let row = UserRepository::new(state.db).create(input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /users/:id
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
    Json(input): Json<UserInput>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Admin)?;
    let row = UserRepository::new(state.db).update(id, input).await?;
    Ok(Json(row))
}

/// DELETE /users/:id
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Admin)?;
    UserRepository::new(state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
