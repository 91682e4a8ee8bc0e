mod error;
mod uuid;

pub use error::flatten_errors;
pub use uuid::uuid;
