use axum::{
    Extension,
    extract::{Json, Query, State, rejection::JsonRejection, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use core::result::Result as CoreResult;
use serde::Serialize;
use serde_json::Value;
use snafu::ResultExt;

use crate::{
    docs::{UPSERT_PASSWORD_SCHEMA, api_info},
    error::{
        ErrorResponse, JsonRejectionSnafu, PayloadSnafu, QueryRejectionSnafu, RegistrySnafu,
        Result, ValidationSnafu,
    },
    health::{check_liveness, check_readiness},
    password::{
        create_password, delete_password, list_passwords, to_password_dto, update_password,
    },
    state::AppState,
    web::response::JsonResponse,
};
use db::password::{ListPasswordsParams, Password};
use dto::{message::MessageDto, password::UpsertPasswordDto};

#[derive(Serialize)]
pub struct AppMeta {
    pub name: String,
    pub version: String,
}

pub async fn home_handler() -> impl IntoResponse {
    Json(AppMeta {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn not_found_handler(State(_state): State<AppState>) -> impl IntoResponse {
    ErrorResponse::new(StatusCode::NOT_FOUND, "Not Found")
}

pub async fn health_live_handler() -> Result<JsonResponse> {
    let health = check_liveness().await?;
    JsonResponse::serialize(StatusCode::OK, &health)
}

pub async fn health_ready_handler(State(state): State<AppState>) -> Result<JsonResponse> {
    let health = check_readiness(state.db).await?;
    let status = if health.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    JsonResponse::serialize(status, &health)
}

pub async fn openapi_handler(State(state): State<AppState>) -> Result<JsonResponse> {
    let doc = state.registry.document(&api_info());
    JsonResponse::serialize(StatusCode::OK, &doc)
}

pub async fn list_passwords_handler(
    State(state): State<AppState>,
    query: CoreResult<Query<ListPasswordsParams>, QueryRejection>,
) -> Result<JsonResponse> {
    let Query(params) = query.context(QueryRejectionSnafu {
        msg: "Invalid query parameters",
    })?;

    let items = list_passwords(&state, &params).await?;
    JsonResponse::serialize(StatusCode::OK, &items)
}

pub async fn get_password_handler(
    State(state): State<AppState>,
    Extension(password): Extension<Password>,
) -> Result<JsonResponse> {
    let dto = to_password_dto(&state, password)?;
    JsonResponse::serialize(StatusCode::OK, &dto)
}

pub async fn create_password_handler(
    State(state): State<AppState>,
    payload: CoreResult<Json<Value>, JsonRejection>,
) -> Result<JsonResponse> {
    let data = parse_upsert_payload(&state, payload)?;
    let _ = create_password(&state, &data).await?;

    let message = MessageDto::new("Password created successfully");
    JsonResponse::serialize(StatusCode::CREATED, &message)
}

pub async fn update_password_handler(
    State(state): State<AppState>,
    Extension(password): Extension<Password>,
    payload: CoreResult<Json<Value>, JsonRejection>,
) -> Result<JsonResponse> {
    let data = parse_upsert_payload(&state, payload)?;
    update_password(&state, password.id.as_str(), &data).await?;

    let message = MessageDto::new("Password updated successfully");
    JsonResponse::serialize(StatusCode::OK, &message)
}

pub async fn delete_password_handler(
    State(state): State<AppState>,
    Extension(password): Extension<Password>,
) -> Result<JsonResponse> {
    delete_password(&state, password.id.as_str()).await?;

    let message = MessageDto::new("Password deleted successfully");
    JsonResponse::serialize(StatusCode::OK, &message)
}

/// Checks the raw body against the registered write view before binding it
fn parse_upsert_payload(
    state: &AppState,
    payload: CoreResult<Json<Value>, JsonRejection>,
) -> Result<UpsertPasswordDto> {
    let Json(value) = payload.context(JsonRejectionSnafu {
        msg: "Invalid request payload",
    })?;

    if let Err(e) = state.registry.validate(UPSERT_PASSWORD_SCHEMA, &value) {
        return match e {
            registry::Error::ValidationFailed { errors, .. } => ValidationSnafu {
                msg: errors.join("; "),
            }
            .fail(),
            other => Err(other).context(RegistrySnafu),
        };
    }

    serde_json::from_value(value).context(PayloadSnafu {
        msg: "Invalid request payload",
    })
}
