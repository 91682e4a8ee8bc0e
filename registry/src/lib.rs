//! Catalog of named JSON schemas and HTTP path descriptors.
//!
//! Shapes are registered once at startup from types deriving
//! [`schemars::JsonSchema`]. Paths refer to those shapes by name. The catalog
//! can then render an OpenAPI document and validate JSON values at runtime.

pub mod error;
pub mod openapi;
pub mod path;
pub mod registry;
pub mod schema;

// Re-export error types for convenience
pub use error::{Error, Result};

pub use openapi::{ApiInfo, OPENAPI_VERSION};
pub use path::{Method, ParamDoc, ParamLocation, PathDoc, ResponseDoc};
pub use registry::Registry;
pub use schema::SchemaRef;
