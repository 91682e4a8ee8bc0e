pub mod db;
pub mod error;
pub mod migrations;
pub mod password;
mod schema;

// Re-export error types for convenience
pub use error::{Error, Result};
