use snafu::ResultExt;

use crate::Result;
use crate::error::{ErrorResponse, RegistrySnafu};
use dto::message::MessageDto;
use dto::password::{PasswordDto, PasswordListItemDto, UpsertPasswordDto};
use registry::{ApiInfo, Method, ParamDoc, PathDoc, Registry, SchemaRef};

pub const PASSWORD_SCHEMA: &str = "Password";
pub const PASSWORD_LIST_ITEM_SCHEMA: &str = "PasswordListItem";
pub const GET_PASSWORDS_SCHEMA: &str = "GetPasswords";
pub const UPSERT_PASSWORD_SCHEMA: &str = "UpsertPassword";
pub const MESSAGE_SCHEMA: &str = "Message";
pub const ERROR_RESPONSE_SCHEMA: &str = "ErrorResponse";

const PASSWORD_TAG: &str = "Password";

pub fn api_info() -> ApiInfo {
    ApiInfo {
        title: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: Some("Stores titled credentials with the secret encrypted at rest".to_string()),
    }
}

/// Builds the registry holding every schema and path the API serves.
/// Any malformed declaration fails here, before the server starts.
pub fn create_api_registry() -> Result<Registry> {
    let mut registry = Registry::new();
    register_schemas(&mut registry).context(RegistrySnafu)?;
    register_password_paths(&mut registry).context(RegistrySnafu)?;
    Ok(registry)
}

fn register_schemas(registry: &mut Registry) -> registry::Result<()> {
    registry.register::<PasswordDto>(PASSWORD_SCHEMA)?;
    let list_item = registry.register::<PasswordListItemDto>(PASSWORD_LIST_ITEM_SCHEMA)?;
    registry.register_alias(GET_PASSWORDS_SCHEMA, SchemaRef::array_of(list_item))?;
    registry.register::<UpsertPasswordDto>(UPSERT_PASSWORD_SCHEMA)?;
    registry.register::<MessageDto>(MESSAGE_SCHEMA)?;
    registry.register::<ErrorResponse>(ERROR_RESPONSE_SCHEMA)?;
    Ok(())
}

fn register_password_paths(registry: &mut Registry) -> registry::Result<()> {
    let id = registry.property(PASSWORD_SCHEMA, "id")?;
    let id_param = ParamDoc::path("id", id).description("Password id");
    let error = || Some(SchemaRef::named(ERROR_RESPONSE_SCHEMA));
    let message = || Some(SchemaRef::named(MESSAGE_SCHEMA));

    registry.register_path(
        PathDoc::new(Method::Get, "/password")
            .operation_id("getPassword")
            .description("Get all user password data")
            .tag(PASSWORD_TAG)
            .param(
                ParamDoc::query("keyword", SchemaRef::string())
                    .description("Only titles containing this text"),
            )
            .response(200, "Password list", Some(SchemaRef::named(GET_PASSWORDS_SCHEMA)))
            .response(400, "Invalid query", error()),
    )?;

    registry.register_path(
        PathDoc::new(Method::Get, "/password/{id}")
            .operation_id("detailPassword")
            .description("Get one user password data by id")
            .tag(PASSWORD_TAG)
            .param(id_param.clone())
            .response(200, "Password data", Some(SchemaRef::named(PASSWORD_SCHEMA)))
            .response(400, "Invalid id", error())
            .response(404, "Password not found", error()),
    )?;

    registry.register_path(
        PathDoc::new(Method::Post, "/password")
            .operation_id("addPassword")
            .description("Create one new password data")
            .tag(PASSWORD_TAG)
            .body(SchemaRef::named(UPSERT_PASSWORD_SCHEMA))
            .response(201, "Password created", message())
            .response(400, "Invalid payload", error()),
    )?;

    registry.register_path(
        PathDoc::new(Method::Put, "/password/{id}")
            .operation_id("editPassword")
            .description("Edit one password data by id")
            .tag(PASSWORD_TAG)
            .param(id_param.clone())
            .body(SchemaRef::named(UPSERT_PASSWORD_SCHEMA))
            .response(200, "Password updated", message())
            .response(400, "Invalid id or payload", error())
            .response(404, "Password not found", error()),
    )?;

    registry.register_path(
        PathDoc::new(Method::Delete, "/password/{id}")
            .operation_id("deletePassword")
            .description("Delete one password data by id")
            .tag(PASSWORD_TAG)
            .param(id_param)
            .response(200, "Password deleted", message())
            .response(400, "Invalid id", error())
            .response(404, "Password not found", error()),
    )?;

    Ok(())
}
