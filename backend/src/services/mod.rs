pub mod api_keys;
pub mod password_reset;
