use chrono::{DateTime, SecondsFormat, Utc};
use snafu::{OptionExt, ResultExt, ensure};
use validator::Validate;

use crate::Result;
use crate::error::{
    CipherSnafu, DbSnafu, MaxPasswordsReachedSnafu, NotFoundSnafu, ValidationSnafu,
    WhateverSnafu,
};
use crate::state::AppState;
use db::password::{ListPasswordsParams, Password, UpdatePassword};
use dto::password::{PasswordDto, PasswordListItemDto, UpsertPasswordDto};
use vault::utils::generate_id;
use vault::validators::flatten_errors;

pub const MAX_PASSWORDS: i64 = 10000;

pub async fn list_passwords(
    state: &AppState,
    params: &ListPasswordsParams,
) -> Result<Vec<PasswordListItemDto>> {
    let items = state.db.passwords.list(params).await.context(DbSnafu)?;
    Ok(items.into_iter().map(|x| x.into()).collect())
}

/// Loads the stored row, secret still encrypted
pub async fn get_password(state: &AppState, id: &str) -> Result<Password> {
    let password = state.db.passwords.get(id).await.context(DbSnafu)?;
    password.context(NotFoundSnafu {
        msg: "Password not found",
    })
}

/// Full record with the secret decrypted
pub fn to_password_dto(state: &AppState, password: Password) -> Result<PasswordDto> {
    let secret = cipher::decrypt(
        state.config.encryption_key.as_str(),
        password.cipher_password.as_str(),
    )
    .context(CipherSnafu)?;

    Ok(PasswordDto {
        id: password.id,
        created_at: format_timestamp(password.created_at)?,
        updated_at: format_timestamp(password.updated_at)?,
        title: password.title,
        username: password.username,
        password: secret,
        url: password.url,
        note: password.note,
    })
}

pub async fn create_password(state: &AppState, data: &UpsertPasswordDto) -> Result<Password> {
    validate_payload(data)?;

    let count = state.db.passwords.count().await.context(DbSnafu)?;
    ensure!(count < MAX_PASSWORDS, MaxPasswordsReachedSnafu);

    let cipher_password = cipher::encrypt(
        state.config.encryption_key.as_str(),
        data.password.as_str(),
    )
    .context(CipherSnafu)?;

    let now = Utc::now().timestamp();
    let password = Password {
        id: generate_id(),
        title: data.title.clone(),
        username: data.username.clone(),
        cipher_password,
        url: data.url.clone(),
        note: data.note.clone(),
        created_at: now,
        updated_at: now,
    };

    state
        .db
        .passwords
        .create(&password)
        .await
        .context(DbSnafu)
}

pub async fn update_password(state: &AppState, id: &str, data: &UpsertPasswordDto) -> Result<()> {
    validate_payload(data)?;

    let cipher_password = cipher::encrypt(
        state.config.encryption_key.as_str(),
        data.password.as_str(),
    )
    .context(CipherSnafu)?;

    let changes = UpdatePassword {
        title: data.title.clone(),
        username: data.username.clone(),
        cipher_password,
        url: data.url.clone(),
        note: data.note.clone(),
        updated_at: Utc::now().timestamp(),
    };

    let updated = state
        .db
        .passwords
        .update(id, &changes)
        .await
        .context(DbSnafu)?;

    ensure!(
        updated,
        NotFoundSnafu {
            msg: "Password not found"
        }
    );

    Ok(())
}

pub async fn delete_password(state: &AppState, id: &str) -> Result<()> {
    state.db.passwords.delete(id).await.context(DbSnafu)
}

fn validate_payload(data: &UpsertPasswordDto) -> Result<()> {
    if let Err(errors) = data.validate() {
        return ValidationSnafu {
            msg: flatten_errors(&errors),
        }
        .fail();
    }
    Ok(())
}

fn format_timestamp(secs: i64) -> Result<String> {
    let dt: DateTime<Utc> = DateTime::from_timestamp(secs, 0).context(WhateverSnafu {
        msg: format!("Invalid timestamp: {}", secs),
    })?;
    Ok(dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::state::{TEST_CREATED_AT, create_test_app_state};
    use db::password::TEST_PASSWORD_ID;

    fn payload(title: &str) -> UpsertPasswordDto {
        UpsertPasswordDto {
            title: title.to_string(),
            username: "euclid".to_string(),
            password: "elements".to_string(),
            url: "https://example.com".to_string(),
            note: "".to_string(),
        }
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp(TEST_CREATED_AT).unwrap().as_str(),
            "2025-10-19T08:00:00Z"
        );
    }

    #[tokio::test]
    async fn test_get_password_decrypts() {
        let state = create_test_app_state();
        let password = get_password(&state, TEST_PASSWORD_ID).await.unwrap();
        assert_ne!(password.cipher_password.as_str(), "triangle-secret");

        let dto = to_password_dto(&state, password).unwrap();
        assert_eq!(dto.id.as_str(), TEST_PASSWORD_ID);
        assert_eq!(dto.password.as_str(), "triangle-secret");
        assert_eq!(dto.created_at.as_str(), "2025-10-19T08:00:00Z");
    }

    #[tokio::test]
    async fn test_get_password_not_found() {
        let state = create_test_app_state();
        let result = get_password(&state, "0196d27b10c47e1abb9aae6cf3eea36a").await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_create_password() {
        let state = create_test_app_state();
        let created = create_password(&state, &payload("Bank")).await.unwrap();

        assert_ne!(created.id.as_str(), TEST_PASSWORD_ID);
        assert!(vault::utils::valid_id(&created.id));
        assert_eq!(created.created_at, created.updated_at);
        assert_ne!(created.cipher_password.as_str(), "elements");

        let items = list_passwords(&state, &ListPasswordsParams::default())
            .await
            .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title.as_str(), "Bank");
        assert_eq!(items[1].title.as_str(), "Mail");
    }

    #[tokio::test]
    async fn test_create_password_invalid() {
        let state = create_test_app_state();
        let result = create_password(&state, &payload("")).await;
        match result {
            Err(Error::Validation { msg }) => {
                assert!(msg.starts_with("title:"));
            }
            _ => panic!("Expected validation error"),
        }
    }

    #[tokio::test]
    async fn test_update_password_keeps_identity() {
        let state = create_test_app_state();
        update_password(&state, TEST_PASSWORD_ID, &payload("Mail v2"))
            .await
            .unwrap();

        let password = get_password(&state, TEST_PASSWORD_ID).await.unwrap();
        assert_eq!(password.id.as_str(), TEST_PASSWORD_ID);
        assert_eq!(password.created_at, TEST_CREATED_AT);
        assert!(password.updated_at > TEST_CREATED_AT);

        let dto = to_password_dto(&state, password).unwrap();
        assert_eq!(dto.title.as_str(), "Mail v2");
        assert_eq!(dto.password.as_str(), "elements");
    }

    #[tokio::test]
    async fn test_update_password_not_found() {
        let state = create_test_app_state();
        let result = update_password(
            &state,
            "0196d27b10c47e1abb9aae6cf3eea36a",
            &payload("Nothing"),
        )
        .await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_password() {
        let state = create_test_app_state();
        delete_password(&state, TEST_PASSWORD_ID).await.unwrap();

        let result = get_password(&state, TEST_PASSWORD_ID).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }
}
