//! 用户路由表

use axum::{routing::get, Router};

use super::handler::{self, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handler::index).post(handler::create))
        .route(
            "/users/:id",
            get(handler::show)
                .put(handler::update)
                .patch(handler::update)
                .delete(handler::destroy),
        )
        .route("/our-custom-route", get(handler::easter_egg))
        .route("/random-user", get(handler::friend_request))
        .route("/health", get(handler::health_check))
}
