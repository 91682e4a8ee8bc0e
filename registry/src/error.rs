use snafu::{Backtrace, Snafu};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Schema already registered: {}", name))]
    DuplicateSchema { name: String },

    #[snafu(display("Schema not registered: {}", name))]
    UnknownSchema { name: String },

    #[snafu(display("Schema {} has no property {}", name, property))]
    UnknownProperty { name: String, property: String },

    #[snafu(display("Invalid schema {}: {}", name, msg))]
    InvalidSchema { name: String, msg: String },

    #[snafu(display("Unable to serialize schema {}: {}", name, source))]
    SchemaSerialize {
        name: String,
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Path already registered: {} {}", method, path))]
    DuplicatePath { method: String, path: String },

    #[snafu(display(
        "Path params mismatch for {}: placeholders [{}], declared [{}]",
        path,
        placeholders,
        declared
    ))]
    PathParamMismatch {
        path: String,
        placeholders: String,
        declared: String,
    },

    #[snafu(display("No responses declared for {} {}", method, path))]
    MissingResponses { method: String, path: String },

    #[snafu(display("Schema not found: {}", name))]
    SchemaNotFound { name: String },

    #[snafu(display("Validation failed against {}: {}", name, errors.join(", ")))]
    ValidationFailed { name: String, errors: Vec<String> },
}
