use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Full password record, secret value included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(rename = "Password")]
pub struct PasswordDto {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub title: String,
    pub username: String,
    pub password: String,
    pub url: String,
    pub note: String,
}

/// Listing projection. Never carries the secret value or the timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[schemars(rename = "PasswordListItem")]
pub struct PasswordListItemDto {
    pub id: String,
    pub title: String,
    pub username: String,
    pub url: String,
    pub note: String,
}

/// Payload accepted on create and edit. Server assigned fields are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[schemars(rename = "UpsertPassword")]
pub struct UpsertPasswordDto {
    #[validate(length(min = 1, max = 100))]
    pub title: String,

    #[validate(length(max = 255))]
    pub username: String,

    #[validate(length(max = 255))]
    pub password: String,

    #[validate(length(max = 2048))]
    pub url: String,

    #[validate(length(max = 5000))]
    pub note: String,
}
