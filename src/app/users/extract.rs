//! 请求预处理
//!
//! 这些提取器在处理器之前运行：按路径 id 加载用户，或从请求体中取出允许写入的字段。

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde_json::Value;

use super::handler::AppState;
use super::model::{User, UserParams};
use crate::core::error::CoreError;

/// 请求体中包装用户字段的键
pub const PARAM_KEY: &str = "user";

/// 按路径 `{id}` 加载的用户，不存在时返回 404
#[derive(Debug)]
pub struct LoadedUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for LoadedUser {
    type Rejection = CoreError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Path(raw_id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| CoreError::BadRequest(rejection.body_text()))?;

        let id = parse_id(&raw_id)?;
        let user = state.user_service.get_user(id).await?;
        Ok(Self(user))
    }
}

/// 非整数的 id 不可能对应任何记录
pub fn parse_id(raw: &str) -> Result<i64, CoreError> {
    raw.parse::<i64>()
        .map_err(|_| CoreError::NotFound(format!("User {} not found", raw)))
}

/// 从 `{"user": {...}}` 中取出的允许字段
#[derive(Debug)]
pub struct PermittedUser(pub UserParams);

#[async_trait]
impl<S> FromRequest<S> for PermittedUser
where
    S: Send + Sync,
{
    type Rejection = CoreError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state).await?;
        permit(body).map(Self)
    }
}

/// 允许写入的字段，均不可为空
pub const PERMITTED_FIELDS: [&str; 2] = ["name", "age"];

/// 要求 `user` 键存在且为非空对象，然后只保留 `name` 和 `age`
///
/// 省略字段表示保持原值；显式的 `null` 会清空必填列，按校验失败处理。
pub fn permit(body: Value) -> Result<UserParams, CoreError> {
    let wrapped = match body {
        Value::Object(mut map) => map.remove(PARAM_KEY),
        _ => None,
    };

    match wrapped {
        Some(Value::Object(fields)) if !fields.is_empty() => {
            let nulls: Vec<String> = PERMITTED_FIELDS
                .iter()
                .filter(|field| matches!(fields.get(**field), Some(Value::Null)))
                .map(|field| format!("{} can't be blank", field))
                .collect();
            if !nulls.is_empty() {
                return Err(CoreError::ValidationError(nulls.join(", ")));
            }

            serde_json::from_value(Value::Object(fields))
                .map_err(|e| CoreError::ValidationError(e.to_string()))
        }
        _ => Err(CoreError::MissingParameter(format!(
            "param is missing or the value is empty: {}",
            PARAM_KEY
        ))),
    }
}
