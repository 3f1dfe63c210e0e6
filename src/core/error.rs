//! 核心错误处理模块

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;
use crate::app::users::store::StoreError;
use crate::core::middleware::current_request_id;

/// 核心错误类型
#[derive(Debug)]
pub enum CoreError {
    BadRequest(String),
    /// 请求体缺少必需的参数包装键
    MissingParameter(String),
    NotFound(String),
    ValidationError(String),
    /// 在空集合中随机挑选
    EmptyCollection,
    InternalServerError(String),
}

/// 错误响应结构
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
    /// 与 `x-request-id` 响应头及请求日志一致
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl CoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::BadRequest(_) | CoreError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) | CoreError::EmptyCollection => StatusCode::NOT_FOUND,
            CoreError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CoreError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CoreError::BadRequest(_) => "BAD_REQUEST",
            CoreError::MissingParameter(_) => "MISSING_PARAMETER",
            CoreError::NotFound(_) => "NOT_FOUND",
            CoreError::ValidationError(_) => "VALIDATION_ERROR",
            CoreError::EmptyCollection => "EMPTY_COLLECTION",
            CoreError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_code = self.code();
        let user_message = match self {
            CoreError::BadRequest(msg)
            | CoreError::MissingParameter(msg)
            | CoreError::NotFound(msg)
            | CoreError::ValidationError(msg) => msg,
            CoreError::EmptyCollection => "There are no users to pick from".to_string(),
            CoreError::InternalServerError(msg) => {
                error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
        };

        let error_response = ErrorResponse {
            error: error_code.to_string(),
            message: user_message,
            code: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            request_id: current_request_id(),
        };

        (status, axum::Json(error_response)).into_response()
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => CoreError::NotFound(format!("User {} not found", id)),
            #[cfg(feature = "database")]
            StoreError::Database(e) => CoreError::InternalServerError(format!("Database error: {}", e)),
        }
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect();
        messages.sort();

        CoreError::ValidationError(messages.join(", "))
    }
}

impl From<JsonRejection> for CoreError {
    fn from(rejection: JsonRejection) -> Self {
        CoreError::BadRequest(rejection.body_text())
    }
}
