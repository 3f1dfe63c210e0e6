//! # users-api
//!
//! 单一资源（users）的 CRUD HTTP 服务，外加两个附属接口：
//! - `GET /our-custom-route` 返回固定字符串
//! - `GET /random-user` 随机返回一个用户
//!
//! 存储通过 [`UserStore`] 注入，默认使用内存实现，开启 `database` 特性后可切换到 PostgreSQL。

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub use app::users::{AppState, User, UserService, UserStore};
pub use config::Config;
pub use crate::core::error::CoreError;

/// 用给定的存储构建完整的应用路由
pub fn build_app(store: Arc<dyn UserStore>, http: &config::HttpConfig) -> Router {
    let state = AppState {
        user_service: UserService::new(store),
    };

    app::users::routes::routes()
        .layer(middleware::from_fn(
            crate::core::middleware::request_logging_middleware,
        ))
        .layer(TimeoutLayer::new(Duration::from_secs(http.timeout_seconds)))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
