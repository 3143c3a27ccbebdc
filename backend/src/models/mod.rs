pub mod api_key;
pub mod task;
pub mod user;
