use axum::extract::FromRef;
use snafu::ResultExt;
use std::sync::Arc;

use crate::{Result, config::Config, docs::create_api_registry, error::DbSnafu};

use db::db::{DbMapper, create_db_mapper};
use registry::Registry;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub config: Config,
    pub db: Arc<DbMapper>,
    pub registry: Arc<Registry>,
}

pub async fn create_app_state(config: &Config) -> Result<AppState> {
    let registry = create_api_registry()?;
    let db = create_db_mapper(config.db.url.as_str())
        .await
        .context(DbSnafu)?;
    Ok(AppState {
        config: config.clone(),
        db: Arc::new(db),
        registry: Arc::new(registry),
    })
}

#[cfg(test)]
pub const TEST_ENCRYPTION_KEY: &str = "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8=";

#[cfg(test)]
pub const TEST_CREATED_AT: i64 = 1760860800;

#[cfg(test)]
pub fn create_test_app_state() -> AppState {
    use crate::config::{DbConfig, ServerConfig};
    use db::db::create_test_db_mapper;
    use db::password::{Password, TEST_PASSWORD_ID};

    let config = Config {
        encryption_key: TEST_ENCRYPTION_KEY.to_string(),
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 43700,
        },
        db: DbConfig {
            url: "-url".to_string(),
        },
    };

    let fixture = Password {
        id: TEST_PASSWORD_ID.to_string(),
        title: "Mail".to_string(),
        username: "pythagoras".to_string(),
        cipher_password: cipher::encrypt(TEST_ENCRYPTION_KEY, "triangle-secret").unwrap(),
        url: "https://mail.example.com".to_string(),
        note: "Personal mailbox".to_string(),
        created_at: TEST_CREATED_AT,
        updated_at: TEST_CREATED_AT,
    };

    let db = create_test_db_mapper(vec![fixture]);
    let registry = create_api_registry().unwrap();

    AppState {
        config,
        db: Arc::new(db),
        registry: Arc::new(registry),
    }
}
