//! Router assembly

use axum::{routing::get, Router};

use crate::extractors::AppState;
use crate::handlers;

/// Build the API router over the shared state.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/platforms",
            get(handlers::platforms::list).post(handlers::platforms::create),
        )
        .route(
            "/platforms/:id",
            get(handlers::platforms::get)
                .put(handlers::platforms::update)
                .delete(handlers::platforms::delete),
        )
        .route(
            "/benches",
            get(handlers::benches::list).post(handlers::benches::create),
        )
        .route(
            "/benches/:id",
            get(handlers::benches::get)
                .put(handlers::benches::update)
                .delete(handlers::benches::delete),
        )
        .route(
            "/benches/:id/technology",
            get(handlers::benches::get_technology).put(handlers::benches::set_technology),
        )
        .route(
            "/benches/:id/operation",
            get(handlers::benches::get_operation).put(handlers::benches::set_operation),
        )
        .route(
            "/benches/:id/installation",
            get(handlers::benches::get_installation).put(handlers::benches::set_installation),
        )
        .route("/benches/:id/pcs", get(handlers::benches::pcs))
        .route("/benches/:id/wetbenches", get(handlers::benches::wetbenches))
        .route(
            "/wetbenches",
            get(handlers::wetbenches::list).post(handlers::wetbenches::create),
        )
        .route(
            "/wetbenches/:id",
            get(handlers::wetbenches::get)
                .put(handlers::wetbenches::update)
                .delete(handlers::wetbenches::delete),
        )
        .route("/pcs", get(handlers::pcs::list).post(handlers::pcs::create))
        .route(
            "/pcs/:id",
            get(handlers::pcs::get)
                .put(handlers::pcs::update)
                .delete(handlers::pcs::delete),
        )
        .route("/pcs/:id/vms", get(handlers::pcs::vms))
        .route("/vms", get(handlers::vms::list).post(handlers::vms::create))
        .route(
            "/vms/:id",
            get(handlers::vms::get)
                .put(handlers::vms::update)
                .delete(handlers::vms::delete),
        )
        .route(
            "/projects",
            get(handlers::projects::list).post(handlers::projects::create),
        )
        .route(
            "/projects/:id",
            get(handlers::projects::get)
                .put(handlers::projects::update)
                .delete(handlers::projects::delete),
        )
        .route(
            "/software",
            get(handlers::software::list).post(handlers::software::create),
        )
        .route(
            "/software/:id",
            get(handlers::software::get)
                .put(handlers::software::update)
                .delete(handlers::software::delete),
        )
        .route(
            "/software/:id/assignments",
            get(handlers::software::assignments).post(handlers::software::add_assignment),
        )
        .route(
            "/software/:id/assignments/:assignment_id",
            axum::routing::delete(handlers::software::remove_assignment),
        )
        .route(
            "/licenses",
            get(handlers::licenses::list).post(handlers::licenses::create),
        )
        .route(
            "/licenses/:id",
            get(handlers::licenses::get)
                .put(handlers::licenses::update)
                .delete(handlers::licenses::delete),
        )
        .route(
            "/licenses/:id/assignments",
            get(handlers::licenses::assignments).put(handlers::licenses::assign),
        )
        .route(
            "/licenses/:id/assignments/:assignment_id",
            axum::routing::delete(handlers::licenses::unassign),
        )
        .route(
            "/users",
            get(handlers::users::list).post(handlers::users::create),
        )
        .route(
            "/users/:id",
            get(handlers::users::get)
                .put(handlers::users::update)
                .delete(handlers::users::delete),
        )
        .route(
            "/groups",
            get(handlers::groups::list).post(handlers::groups::create),
        )
        .route(
            "/groups/:id",
            get(handlers::groups::get)
                .put(handlers::groups::update)
                .delete(handlers::groups::delete),
        )
        .with_state(state)
}
