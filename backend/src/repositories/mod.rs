pub mod api_key;
pub mod auth_store;
pub mod task;
pub mod user;
