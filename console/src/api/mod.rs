pub mod attendance;
pub mod auth;
pub mod client;
pub mod departments;
pub mod employees;
pub mod leaves;
pub mod notifications;
pub mod types;

pub use client::ApiClient;
pub use types::*;
