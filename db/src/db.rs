use std::sync::Arc;

use deadpool_diesel::sqlite::{Manager, Pool, Runtime};

use crate::Result;
use crate::error::Error;
use crate::migrations::run_migrations;
use crate::password::{PasswordRepo, PasswordRepoable};

pub fn create_db_pool(database_url: &str) -> Result<Pool> {
    let manager = Manager::new(database_url, Runtime::Tokio1);
    Pool::builder(manager)
        .max_size(8)
        .build()
        .map_err(|e| Error::DbBuild { msg: e.to_string() })
}

pub struct DbMapper {
    pub passwords: Arc<dyn PasswordRepoable>,
}

/// Opens the pool and brings the schema up to date
pub async fn create_db_mapper(database_url: &str) -> Result<DbMapper> {
    let pool = create_db_pool(database_url)?;
    run_migrations(&pool).await?;
    Ok(DbMapper {
        passwords: Arc::new(PasswordRepo::new(pool)),
    })
}

#[cfg(any(test, feature = "test"))]
pub fn create_test_db_mapper(items: Vec<crate::password::Password>) -> DbMapper {
    use crate::password::PasswordTestRepo;

    DbMapper {
        passwords: Arc::new(PasswordTestRepo::with_items(items)),
    }
}
