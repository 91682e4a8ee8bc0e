pub mod message;
pub mod password;
