//! 基础设施层：日志与存储实现

#[cfg(feature = "database")]
pub mod database;
pub mod logger;
pub mod memory;
