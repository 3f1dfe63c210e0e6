//! 用户存储接口

use async_trait::async_trait;

use super::model::{NewUser, User, UserChanges};

/// 存储层错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("用户 {0} 不存在")]
    NotFound(i64),
    #[cfg(feature = "database")]
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
}

/// 用户记录的持久化协作者
///
/// 每个操作只做一次读或写，不做重试，也不跨语句开事务。
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 后端名称，用于健康检查和日志
    fn backend(&self) -> &'static str;

    /// 全部用户，按 id 升序
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<User, StoreError>;

    /// 插入新用户并分配新的 id
    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// 部分更新，未提供的字段保持不变
    async fn update(&self, id: i64, changes: UserChanges) -> Result<User, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.list().await?.len())
    }
}
