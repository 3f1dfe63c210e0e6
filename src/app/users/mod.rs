//! 用户资源

pub mod extract;
pub mod handler;
pub mod model;
pub mod routes;
pub mod service;
pub mod store;

pub use handler::AppState;
pub use model::User;
pub use service::UserService;
pub use store::{StoreError, UserStore};
