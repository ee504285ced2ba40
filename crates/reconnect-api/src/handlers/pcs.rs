//! PC handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use reconnect_core::{Id, PermissionLevel};
use reconnect_db::{PcInput, PcRepository};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, CurrentUser};

/// GET /pcs
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let rows = PcRepository::new(state.db).list().await?;
    Ok(Json(rows))
}

/// GET /pcs/:id
pub async fn get(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let row = PcRepository::new(state.db)
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("pc", id))?;
    Ok(Json(row))
}

/// POST /pcs
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<PcInput>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    let row = PcRepository::new(state.db).create(input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /pcs/:id
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
    Json(input): Json<PcInput>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    let row = PcRepository::new(state.db).update(id, input).await?;
    Ok(Json(row))
}

/// DELETE /pcs/:id
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    PcRepository::new(state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /pcs/:id/vms
pub async fn vms(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let rows = reconnect_db::VmRepository::new(state.db).list_for_pc(id).await?;
    Ok(Json(rows))
}
