//! Test bench handlers
//!
//! Besides plain CRUD, a bench exposes its three one-to-one detail records
//! and the PCs/wetbenches attached to it as sub-resources.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use reconnect_core::{Id, PermissionLevel};
use reconnect_db::{
    BenchInput, BenchRepository, InstallationInput, OperationInput, PcRepository, TechnologyInput,
    WetbenchRepository,
};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, CurrentUser};

/// GET /benches
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let rows = BenchRepository::new(state.db).list().await?;
    Ok(Json(rows))
}

/// GET /benches/:id
pub async fn get(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let row = BenchRepository::new(state.db)
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("bench", id))?;
    Ok(Json(row))
}

/// POST /benches
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<BenchInput>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    let row = BenchRepository::new(state.db).create(input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /benches/:id
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
    Json(input): Json<BenchInput>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    let row = BenchRepository::new(state.db).update(id, input).await?;
    Ok(Json(row))
}

/// DELETE /benches/:id
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    BenchRepository::new(state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /benches/:id/technology
pub async fn get_technology(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let row = BenchRepository::new(state.db)
        .technology(id)
        .await?
        .ok_or_else(|| ApiError::not_found("hil technology", id))?;
    Ok(Json(row))
}

/// PUT /benches/:id/technology
pub async fn set_technology(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
    Json(input): Json<TechnologyInput>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    let repo = BenchRepository::new(state.db);
    require_bench(&repo, id).await?;
    let row = repo.set_technology(id, input).await?;
    Ok(Json(row))
}

/// GET /benches/:id/operation
pub async fn get_operation(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let row = BenchRepository::new(state.db)
        .operation(id)
        .await?
        .ok_or_else(|| ApiError::not_found("hil operation", id))?;
    Ok(Json(row))
}

/// PUT /benches/:id/operation
pub async fn set_operation(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
    Json(input): Json<OperationInput>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    let repo = BenchRepository::new(state.db);
    require_bench(&repo, id).await?;
    let row = repo.set_operation(id, input).await?;
    Ok(Json(row))
}

/// GET /benches/:id/installation
pub async fn get_installation(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let row = BenchRepository::new(state.db)
        .installation(id)
        .await?
        .ok_or_else(|| ApiError::not_found("hardware installation", id))?;
    Ok(Json(row))
}

/// PUT /benches/:id/installation
pub async fn set_installation(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
    Json(input): Json<InstallationInput>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Edit)?;
    let repo = BenchRepository::new(state.db);
    require_bench(&repo, id).await?;
    let row = repo.set_installation(id, input).await?;
    Ok(Json(row))
}

/// GET /benches/:id/pcs
pub async fn pcs(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let rows = PcRepository::new(state.db).list_for_bench(id).await?;
    Ok(Json(rows))
}

/// GET /benches/:id/wetbenches
pub async fn wetbenches(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    user.require(PermissionLevel::Read)?;
    let rows = WetbenchRepository::new(state.db).list_for_bench(id).await?;
    Ok(Json(rows))
}

async fn require_bench(repo: &BenchRepository, id: Id) -> Result<(), ApiError> {
    repo.find_by_id(id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::not_found("bench", id))
}
