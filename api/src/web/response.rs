use axum::{
    body::Body,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use snafu::ResultExt;

use crate::Result;
use crate::error::JsonSerializeSnafu;

/// Pre-serialized JSON body with a status code
pub struct JsonResponse {
    status_code: StatusCode,
    data: String,
}

impl JsonResponse {
    pub fn with_status(status_code: StatusCode, data: String) -> Self {
        Self { status_code, data }
    }

    pub fn serialize<T: Serialize>(status_code: StatusCode, value: &T) -> Result<Self> {
        let data = serde_json::to_string(value).context(JsonSerializeSnafu)?;
        Ok(Self::with_status(status_code, data))
    }
}

impl IntoResponse for JsonResponse {
    fn into_response(self) -> Response<Body> {
        (
            self.status_code,
            [(header::CONTENT_TYPE, "application/json")],
            self.data,
        )
            .into_response()
    }
}
