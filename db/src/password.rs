use async_trait::async_trait;

use deadpool_diesel::sqlite::Pool;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::{QueryDsl, SelectableHelper};
use serde::Deserialize;
use snafu::ResultExt;
use validator::Validate;

use crate::Result;
use crate::error::{DbInteractSnafu, DbPoolSnafu, DbQuerySnafu, ValidationSnafu};
use crate::schema::passwords::{self, dsl};
use dto::password::PasswordListItemDto;
use vault::validators::flatten_errors;

/// Stored password record. The secret is kept encrypted.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::passwords)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Password {
    pub id: String,
    pub title: String,
    pub username: String,
    pub cipher_password: String,
    pub url: String,
    pub note: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Columns replaced on edit. Id and created_at are never part of it.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = crate::schema::passwords)]
pub struct UpdatePassword {
    pub title: String,
    pub username: String,
    pub cipher_password: String,
    pub url: String,
    pub note: String,
    pub updated_at: i64,
}

/// Listing never needs the secret, no decryption involved
impl From<Password> for PasswordListItemDto {
    fn from(password: Password) -> Self {
        Self {
            id: password.id,
            title: password.title,
            username: password.username,
            url: password.url,
            note: password.note,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListPasswordsParams {
    #[validate(length(min = 0, max = 50))]
    pub keyword: Option<String>,
}

// Listing is never paginated, cap what a single response can carry
const MAX_LISTING: i64 = 10000;

/// Substring pattern with LIKE wildcards in the keyword taken literally
fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if c == '\\' || c == '%' || c == '_' {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
pub trait PasswordRepoable: Send + Sync {
    async fn list(&self, params: &ListPasswordsParams) -> Result<Vec<Password>>;

    async fn create(&self, data: &Password) -> Result<Password>;

    async fn get(&self, id: &str) -> Result<Option<Password>>;

    async fn update(&self, id: &str, data: &UpdatePassword) -> Result<bool>;

    async fn delete(&self, id: &str) -> Result<()>;

    async fn count(&self) -> Result<i64>;

    async fn test_read(&self) -> Result<()>;
}

pub struct PasswordRepo {
    db_pool: Pool,
}

impl PasswordRepo {
    pub fn new(db_pool: Pool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PasswordRepoable for PasswordRepo {
    async fn list(&self, params: &ListPasswordsParams) -> Result<Vec<Password>> {
        if let Err(errors) = params.validate() {
            return ValidationSnafu {
                msg: flatten_errors(&errors),
            }
            .fail();
        }

        let db = self.db_pool.get().await.context(DbPoolSnafu)?;

        let params_copy = params.clone();
        let select_res = db
            .interact(move |conn| {
                let mut query = dsl::passwords.into_boxed();
                if let Some(keyword) = params_copy.keyword {
                    if keyword.len() > 0 {
                        let pattern = like_pattern(keyword.as_str());
                        query = query.filter(dsl::title.like(pattern).escape('\\'));
                    }
                }
                query
                    .select(Password::as_select())
                    .order((dsl::title.asc(), dsl::id.asc()))
                    .limit(MAX_LISTING)
                    .load::<Password>(conn)
            })
            .await
            .context(DbInteractSnafu)?;

        let items = select_res.context(DbQuerySnafu {
            table: "passwords".to_string(),
        })?;

        Ok(items)
    }

    async fn create(&self, data: &Password) -> Result<Password> {
        let db = self.db_pool.get().await.context(DbPoolSnafu)?;

        let password = data.clone();
        let password_copy = password.clone();
        let insert_res = db
            .interact(move |conn| {
                diesel::insert_into(passwords::table)
                    .values(&password_copy)
                    .execute(conn)
            })
            .await
            .context(DbInteractSnafu)?;

        let _ = insert_res.context(DbQuerySnafu {
            table: "passwords".to_string(),
        })?;

        Ok(password)
    }

    async fn get(&self, id: &str) -> Result<Option<Password>> {
        let db = self.db_pool.get().await.context(DbPoolSnafu)?;

        let pid = id.to_string();
        let select_res = db
            .interact(move |conn| {
                dsl::passwords
                    .find(pid)
                    .select(Password::as_select())
                    .first::<Password>(conn)
                    .optional()
            })
            .await
            .context(DbInteractSnafu)?;

        let item = select_res.context(DbQuerySnafu {
            table: "passwords".to_string(),
        })?;

        Ok(item)
    }

    async fn update(&self, id: &str, data: &UpdatePassword) -> Result<bool> {
        let db = self.db_pool.get().await.context(DbPoolSnafu)?;

        let pid = id.to_string();
        let data_copy = data.clone();
        let update_res = db
            .interact(move |conn| {
                diesel::update(dsl::passwords.find(pid))
                    .set(&data_copy)
                    .execute(conn)
            })
            .await
            .context(DbInteractSnafu)?;

        let affected = update_res.context(DbQuerySnafu {
            table: "passwords".to_string(),
        })?;

        Ok(affected > 0)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let db = self.db_pool.get().await.context(DbPoolSnafu)?;

        let pid = id.to_string();
        let delete_res = db
            .interact(move |conn| {
                diesel::delete(dsl::passwords.filter(dsl::id.eq(pid))).execute(conn)
            })
            .await
            .context(DbInteractSnafu)?;

        let _ = delete_res.context(DbQuerySnafu {
            table: "passwords".to_string(),
        })?;

        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let db = self.db_pool.get().await.context(DbPoolSnafu)?;

        let count_res = db
            .interact(move |conn| {
                dsl::passwords
                    .select(count_star())
                    .get_result::<i64>(conn)
            })
            .await
            .context(DbInteractSnafu)?;

        let count = count_res.context(DbQuerySnafu {
            table: "passwords".to_string(),
        })?;

        Ok(count)
    }

    async fn test_read(&self) -> Result<()> {
        let db = self.db_pool.get().await.context(DbPoolSnafu)?;

        let selected_res = db
            .interact(move |conn| {
                dsl::passwords
                    .select(Password::as_select())
                    .first::<Password>(conn)
                    .optional()
            })
            .await
            .context(DbInteractSnafu)?;

        let _ = selected_res.context(DbQuerySnafu {
            table: "passwords".to_string(),
        })?;

        Ok(())
    }
}

#[cfg(any(test, feature = "test"))]
pub const TEST_PASSWORD_ID: &'static str = "0196d1bbc22f79c89cdbc8beced0d2f0";

/// In-memory repo that mirrors the sqlite repo semantics
#[cfg(any(test, feature = "test"))]
pub struct PasswordTestRepo {
    items: std::sync::Mutex<Vec<Password>>,
}

#[cfg(any(test, feature = "test"))]
impl PasswordTestRepo {
    pub fn with_items(items: Vec<Password>) -> Self {
        Self {
            items: std::sync::Mutex::new(items),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Password>>> {
        self.items
            .lock()
            .map_err(|_| "Test repo lock poisoned".into())
    }
}

#[cfg(any(test, feature = "test"))]
#[async_trait]
impl PasswordRepoable for PasswordTestRepo {
    async fn list(&self, params: &ListPasswordsParams) -> Result<Vec<Password>> {
        if let Err(errors) = params.validate() {
            return ValidationSnafu {
                msg: flatten_errors(&errors),
            }
            .fail();
        }

        // Same matching as sqlite LIKE: ASCII case-insensitive substring
        let keyword = params
            .keyword
            .clone()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let mut items: Vec<Password> = self
            .lock()?
            .iter()
            .filter(|x| x.title.to_ascii_lowercase().contains(keyword.as_str()))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn create(&self, data: &Password) -> Result<Password> {
        let mut items = self.lock()?;
        snafu::ensure!(
            !items.iter().any(|x| x.id == data.id),
            ValidationSnafu {
                msg: "Duplicate password id".to_string(),
            }
        );
        items.push(data.clone());
        Ok(data.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Password>> {
        let items = self.lock()?;
        Ok(items.iter().find(|x| x.id.as_str() == id).cloned())
    }

    async fn update(&self, id: &str, data: &UpdatePassword) -> Result<bool> {
        let mut items = self.lock()?;
        let found = items.iter_mut().find(|x| x.id.as_str() == id);
        match found {
            Some(item) => {
                item.title = data.title.clone();
                item.username = data.username.clone();
                item.cipher_password = data.cipher_password.clone();
                item.url = data.url.clone();
                item.note = data.note.clone();
                item.updated_at = data.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut items = self.lock()?;
        items.retain(|x| x.id.as_str() != id);
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.lock()?.len() as i64)
    }

    async fn test_read(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_password(id: &str, title: &str) -> Password {
        Password {
            id: id.to_string(),
            title: title.to_string(),
            username: "ada".to_string(),
            cipher_password: "not-really-encrypted".to_string(),
            url: "https://example.com".to_string(),
            note: "".to_string(),
            created_at: 1760860800,
            updated_at: 1760860800,
        }
    }

    fn create_test_repo() -> PasswordTestRepo {
        PasswordTestRepo::with_items(vec![
            create_test_password(TEST_PASSWORD_ID, "Mail"),
            create_test_password("0196d27b10c47e1abb9aae6cf3eea36a", "Bank"),
        ])
    }

    #[test]
    fn test_list_params() {
        let params = ListPasswordsParams {
            keyword: Some("mail".to_string()),
        };
        assert!(params.validate().is_ok());

        let params = ListPasswordsParams {
            keyword: Some("k".repeat(51)),
        };
        assert!(params.validate().is_err());
    }

    #[tokio::test]
    async fn test_list_sorted_and_filtered() {
        let repo = create_test_repo();
        let items = repo.list(&ListPasswordsParams::default()).await.unwrap();
        let titles: Vec<&str> = items.iter().map(|x| x.title.as_str()).collect();
        assert_eq!(titles, vec!["Bank", "Mail"]);

        let params = ListPasswordsParams {
            keyword: Some("Ma".to_string()),
        };
        let items = repo.list(&params).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id.as_str(), TEST_PASSWORD_ID);
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_created_at() {
        let repo = create_test_repo();
        let data = UpdatePassword {
            title: "Mail (work)".to_string(),
            username: "ada.l".to_string(),
            cipher_password: "other".to_string(),
            url: "https://mail.example.com".to_string(),
            note: "rotated".to_string(),
            updated_at: 1760947200,
        };
        assert!(repo.update(TEST_PASSWORD_ID, &data).await.unwrap());

        let updated = repo.get(TEST_PASSWORD_ID).await.unwrap().unwrap();
        assert_eq!(updated.id.as_str(), TEST_PASSWORD_ID);
        assert_eq!(updated.created_at, 1760860800);
        assert_eq!(updated.updated_at, 1760947200);
        assert_eq!(updated.title.as_str(), "Mail (work)");

        let missing = repo
            .update("0196d277ffc47800ba5e7ffb6a557f31", &data)
            .await
            .unwrap();
        assert!(!missing);
    }

    #[test]
    fn test_list_item_conversion() {
        let item: PasswordListItemDto = create_test_password(TEST_PASSWORD_ID, "Mail").into();
        assert_eq!(item.id.as_str(), TEST_PASSWORD_ID);
        assert_eq!(item.title.as_str(), "Mail");
        assert_eq!(item.url.as_str(), "https://example.com");
    }

    #[tokio::test]
    async fn test_create_delete() {
        let repo = create_test_repo();
        let created = create_test_password("0196d277ffc47800ba5e7ffb6a557f31", "Forum");
        repo.create(&created).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 3);

        // Ids are unique
        assert!(repo.create(&created).await.is_err());

        repo.delete(TEST_PASSWORD_ID).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);
        assert!(repo.get(TEST_PASSWORD_ID).await.unwrap().is_none());
    }

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("mail").as_str(), "%mail%");
        assert_eq!(like_pattern("50%_off\\").as_str(), "%50\\%\\_off\\\\%");
    }

    struct SqliteFixture {
        repo: PasswordRepo,
        path: std::path::PathBuf,
    }

    impl Drop for SqliteFixture {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    async fn create_sqlite_fixture(items: &[Password]) -> SqliteFixture {
        use crate::db::create_db_pool;
        use crate::migrations::run_migrations;
        use vault::utils::generate_id;

        let path = std::env::temp_dir().join(format!("passkeep-{}.db", generate_id()));
        let pool = create_db_pool(path.to_str().unwrap()).unwrap();
        run_migrations(&pool).await.unwrap();

        // Running twice must be harmless
        run_migrations(&pool).await.unwrap();

        let repo = PasswordRepo::new(pool);
        for item in items.iter() {
            repo.create(item).await.unwrap();
        }
        SqliteFixture { repo, path }
    }

    fn shared_items() -> Vec<Password> {
        vec![
            create_test_password(TEST_PASSWORD_ID, "Mail"),
            create_test_password("0196d27b10c47e1abb9aae6cf3eea36a", "Bank"),
            create_test_password("0196d277ffc47800ba5e7ffb6a557f31", "50% off_deal"),
        ]
    }

    async fn list_ids(repo: &dyn PasswordRepoable, keyword: Option<&str>) -> Vec<String> {
        let params = ListPasswordsParams {
            keyword: keyword.map(|k| k.to_string()),
        };
        let items = repo.list(&params).await.unwrap();
        items.into_iter().map(|x| x.id).collect()
    }

    #[tokio::test]
    async fn test_sqlite_and_memory_repos_agree() {
        let fixture = create_sqlite_fixture(&shared_items()).await;
        let sqlite: &dyn PasswordRepoable = &fixture.repo;
        let memory_repo = PasswordTestRepo::with_items(shared_items());
        let memory: &dyn PasswordRepoable = &memory_repo;

        let cases: Vec<(Option<&str>, usize)> = vec![
            (None, 3),
            (Some(""), 3),
            (Some("mail"), 1),
            (Some("MAIL"), 1),
            (Some("a"), 3),
            (Some("%"), 1),
            (Some("_"), 1),
            (Some("off_"), 1),
            (Some("M_il"), 0),
            (Some("\\"), 0),
        ];
        for (keyword, expected) in cases.into_iter() {
            let from_sqlite = list_ids(sqlite, keyword).await;
            let from_memory = list_ids(memory, keyword).await;
            assert_eq!(from_sqlite, from_memory, "keyword {:?}", keyword);
            assert_eq!(from_sqlite.len(), expected, "keyword {:?}", keyword);
        }

        // Ordered by title, then id
        let all = list_ids(sqlite, None).await;
        assert_eq!(
            all,
            vec![
                "0196d277ffc47800ba5e7ffb6a557f31".to_string(),
                "0196d27b10c47e1abb9aae6cf3eea36a".to_string(),
                TEST_PASSWORD_ID.to_string(),
            ]
        );

        let params = ListPasswordsParams {
            keyword: Some("k".repeat(51)),
        };
        assert!(sqlite.list(&params).await.is_err());
        assert!(memory.list(&params).await.is_err());
    }

    #[tokio::test]
    async fn test_sqlite_and_memory_writes_agree() {
        let fixture = create_sqlite_fixture(&shared_items()).await;
        let memory_repo = PasswordTestRepo::with_items(shared_items());
        let repos: Vec<&dyn PasswordRepoable> = vec![&fixture.repo, &memory_repo];

        let data = UpdatePassword {
            title: "Mail (work)".to_string(),
            username: "ada.l".to_string(),
            cipher_password: "other".to_string(),
            url: "https://mail.example.com".to_string(),
            note: "rotated".to_string(),
            updated_at: 1760947200,
        };

        let mut snapshots: Vec<Option<Password>> = Vec::new();
        for repo in repos.iter() {
            assert!(
                !repo
                    .update("0196d2800000700080000000000000aa", &data)
                    .await
                    .unwrap()
            );
            assert!(repo.update(TEST_PASSWORD_ID, &data).await.unwrap());
            snapshots.push(repo.get(TEST_PASSWORD_ID).await.unwrap());

            let duplicate = create_test_password(TEST_PASSWORD_ID, "Again");
            assert!(repo.create(&duplicate).await.is_err());

            repo.delete(TEST_PASSWORD_ID).await.unwrap();
            repo.delete("0196d2800000700080000000000000aa").await.unwrap();
            assert_eq!(repo.count().await.unwrap(), 2);
            assert!(repo.get(TEST_PASSWORD_ID).await.unwrap().is_none());
            assert!(repo.test_read().await.is_ok());
        }

        assert_eq!(snapshots[0], snapshots[1]);
        let updated = snapshots[0].clone().unwrap();
        assert_eq!(updated.created_at, 1760860800);
        assert_eq!(updated.updated_at, 1760947200);
        assert_eq!(updated.title.as_str(), "Mail (work)");
    }
}
