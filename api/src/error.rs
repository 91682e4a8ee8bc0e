use axum::{
    Json,
    body::Body,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use snafu::{Backtrace, ErrorCompat, Snafu};
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Error reading config file: {}", source))]
    ConfigFile {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Error parsing config file: {}", source))]
    ConfigParse {
        source: toml::de::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Config error: {}", msg))]
    Config { msg: String },

    #[snafu(display("Unable to bind server address: {}", source))]
    ServerBind {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Server error: {}", source))]
    Server {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Unable to write file: {:?}", path))]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("{}", source))]
    Db {
        source: db::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("{}", source))]
    Cipher {
        source: cipher::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("{}", source))]
    Registry {
        source: registry::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Unable to serialize response: {}", source))]
    JsonSerialize {
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("{}", msg))]
    Validation { msg: String },

    #[snafu(display("Maximum number of passwords reached: 10000"))]
    MaxPasswordsReached,

    #[snafu(display("{}", msg))]
    BadRequest { msg: String },

    #[snafu(display("{}", msg))]
    JsonRejection {
        msg: String,
        source: JsonRejection,
        backtrace: Backtrace,
    },

    #[snafu(display("{}", msg))]
    QueryRejection {
        msg: String,
        source: QueryRejection,
        backtrace: Backtrace,
    },

    #[snafu(display("{}: {}", msg, source))]
    Payload {
        msg: String,
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("{}", msg))]
    NotFound { msg: String },

    #[snafu(display("{}", msg))]
    Whatever { msg: String },
}

// Allow string slices to be converted to Error
impl From<&str> for Error {
    fn from(val: &str) -> Self {
        Self::Whatever {
            msg: val.to_string(),
        }
    }
}

impl From<String> for Error {
    fn from(val: String) -> Self {
        Self::Whatever { msg: val }
    }
}

/// Allow Error to be converted to StatusCode
impl From<&Error> for StatusCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::MaxPasswordsReached => StatusCode::BAD_REQUEST,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::JsonRejection { .. } => StatusCode::BAD_REQUEST,
            Error::QueryRejection { .. } => StatusCode::BAD_REQUEST,
            Error::Payload { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Db { source, .. } => match source {
                db::Error::Validation { .. } => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Allow errors to be rendered as response
impl IntoResponse for Error {
    fn into_response(self) -> Response<Body> {
        let status_code = StatusCode::from(&self);
        let message = format!("{}", self);
        let mut backtrace: Option<String> = None;
        if let Some(bt) = ErrorCompat::backtrace(&self) {
            backtrace = Some(format!("{}", bt));
        }

        // Placeholder response, rendered later by the response mapper
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        res.extensions_mut().insert(ErrorInfo {
            status_code,
            message,
            backtrace,
        });

        res
    }
}

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse {
    pub status_code: u16,
    pub message: String,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(status_code: StatusCode, message: &str) -> Self {
        Self {
            status_code: status_code.as_u16(),
            message: message.to_string(),
            error: status_code
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response<Body> {
        let status_code =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status_code, Json(self)).into_response()
    }
}

#[derive(Clone)]
pub struct ErrorInfo {
    pub status_code: StatusCode,
    pub message: String,
    pub backtrace: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use snafu::ResultExt;

    #[test]
    fn test_status_codes() {
        let err = Error::Validation {
            msg: "title: must be between 1 and 100 characters".to_string(),
        };
        assert_eq!(StatusCode::from(&err), StatusCode::BAD_REQUEST);

        let err = Error::NotFound {
            msg: "Password not found".to_string(),
        };
        assert_eq!(StatusCode::from(&err), StatusCode::NOT_FOUND);

        let err: Error = "boom".into();
        assert_eq!(StatusCode::from(&err), StatusCode::INTERNAL_SERVER_ERROR);

        let err = Err::<(), _>(db::Error::Validation {
            msg: "keyword: must be at most 50 characters".to_string(),
        })
        .context(DbSnafu)
        .unwrap_err();
        assert_eq!(StatusCode::from(&err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_response() {
        let body = ErrorResponse::new(StatusCode::NOT_FOUND, "Not Found");
        assert_eq!(body.status_code, 404);
        assert_eq!(body.error.as_str(), "Not Found");
    }
}
