//! Axum extractors: application state and the per-route permission gate.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use reconnect_core::PermissionLevel;
use reconnect_db::{users::UserPermission, Database, UserRepository};

use crate::error::ApiError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// The caller identity resolved for this request.
///
/// Session handling lives in the external auth layer; it forwards the
/// authenticated user id in the `x-user-id` header. This extractor loads the
/// user and the permission level of their group.
pub struct CurrentUser(pub UserPermission);

impl CurrentUser {
    /// Enforce the route's required permission level.
    pub fn require(&self, level: PermissionLevel) -> Result<(), ApiError> {
        if !self.0.active {
            return Err(ApiError::forbidden("user account is deactivated"));
        }
        if self.0.permission_level.allows(level) {
            Ok(())
        } else {
            Err(ApiError::forbidden(format!(
                "{} permission required",
                level
            )))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok())
            .ok_or_else(|| ApiError::unauthorized("missing or malformed x-user-id header"))?;

        let permission = UserRepository::new(app_state.db)
            .find_permission(user_id)
            .await?
            .ok_or_else(|| ApiError::unauthorized("unknown user"))?;

        Ok(CurrentUser(permission))
    }
}

impl std::ops::Deref for CurrentUser {
    type Target = UserPermission;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
