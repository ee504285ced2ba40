//! # reconnect-api
//!
//! HTTP surface for Chassis ReConnect: axum handlers over the repository
//! layer, a typed error-to-status mapping, and the per-route permission gate
//! (Read for GETs, Edit for inventory mutation, Admin for user and group
//! administration).

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use extractors::{AppState, CurrentUser};
pub use routes::api_router;
