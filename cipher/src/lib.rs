pub mod encryption;
pub mod error;

// Re-export error types for convenience
pub use error::{Error, Result};

pub use encryption::{decrypt, encrypt, generate_key, valid_key};
