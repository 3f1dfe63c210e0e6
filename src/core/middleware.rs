//! 核心中间件模块

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// 请求 id 所在的请求头/响应头
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

tokio::task_local! {
    static REQUEST_ID: String;
}

/// 当前请求的 id，在请求日志中间件之外调用时为 `None`
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

/// 沿用客户端传入的 `x-request-id`，否则生成新的 UUID
fn request_id_for(req: &Request) -> String {
    req.headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| !id.is_empty() && id.len() <= 128)
        .map(|id| id.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// 请求日志中间件
///
/// 为每个请求分配 id：日志行、错误响应体和 `x-request-id` 响应头使用同一个值。
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let request_id = request_id_for(&req);

    let mut response = REQUEST_ID.scope(request_id.clone(), next.run(req)).await;
    let status = response.status();
    let duration = start.elapsed();

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER.clone(), value);
    }

    if status.is_server_error() {
        warn!(
            "[{}] {} {} - {} - {}ms",
            request_id,
            method,
            uri,
            status,
            duration.as_millis()
        );
    } else {
        info!(
            "[{}] {} {} - {} - {}ms",
            request_id,
            method,
            uri,
            status,
            duration.as_millis()
        );
    }

    response
}
