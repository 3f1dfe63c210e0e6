//! 用户业务服务

use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::{debug, info};
use validator::Validate;

use super::model::{NewUser, User, UserChanges, UserParams};
use super::store::UserStore;
use crate::core::error::CoreError;

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub async fn list_users(&self) -> Result<Vec<User>, CoreError> {
        Ok(self.store.list().await?)
    }

    pub async fn count_users(&self) -> Result<usize, CoreError> {
        Ok(self.store.count().await?)
    }

    pub async fn get_user(&self, id: i64) -> Result<User, CoreError> {
        Ok(self.store.get_by_id(id).await?)
    }

    /// 创建用户，name 和 age 均为必填
    pub async fn create_user(&self, params: UserParams) -> Result<User, CoreError> {
        let params = params.normalized();
        params.validate()?;

        let new_user = match params {
            UserParams {
                name: Some(name),
                age: Some(age),
            } => NewUser { name, age },
            UserParams { name, age } => {
                let mut missing = Vec::new();
                if name.is_none() {
                    missing.push("name can't be blank");
                }
                if age.is_none() {
                    missing.push("age can't be blank");
                }
                return Err(CoreError::ValidationError(missing.join(", ")));
            }
        };

        let user = self.store.insert(new_user).await?;
        info!("Created user: {} ({})", user.name, user.id);
        Ok(user)
    }

    /// 部分更新用户，未提供的字段保持不变
    pub async fn update_user(&self, id: i64, params: UserParams) -> Result<User, CoreError> {
        let params = params.normalized();
        params.validate()?;

        let changes = UserChanges::from(params);
        if changes.is_empty() {
            debug!("No permitted fields to update for user {}", id);
        }

        let user = self.store.update(id, changes).await?;
        info!("Updated user: {} ({})", user.name, user.id);
        Ok(user)
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), CoreError> {
        self.store.delete(id).await?;
        info!("Deleted user: {}", id);
        Ok(())
    }

    /// 从全部用户中均匀随机挑选一个
    pub async fn random_user(&self) -> Result<User, CoreError> {
        let users = self.store.list().await?;
        let picked = users.choose(&mut rand::thread_rng()).cloned();
        picked.ok_or(CoreError::EmptyCollection)
    }
}
