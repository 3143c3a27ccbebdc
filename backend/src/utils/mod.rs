pub mod api_key;
pub mod email;
pub mod jwt;
pub mod password;
