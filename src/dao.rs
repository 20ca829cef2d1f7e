use crate::error::StoreError;
use crate::model::ShortLink;
use crate::utils::with_timeout;
use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::{Error, PgPool};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// Another row already owns the normalized url; nothing was written.
    UrlTaken,
    /// The generated code is already in use.
    CodeTaken,
}

#[async_trait]
pub trait LinkStore: Send + Sync {
    async fn find_by_normalized_url(
        &self,
        normalized_url: &str,
    ) -> Result<Option<ShortLink>, StoreError>;

    /// Must be a no-op when `normalized_url` already exists.
    async fn insert(
        &self,
        code: &str,
        original_url: &str,
        normalized_url: &str,
    ) -> Result<InsertOutcome, StoreError>;

    /// Returns the original url of `code`. With `count_click` the click counter
    /// is incremented by the same statement that reads the url.
    async fn resolve(&self, code: &str, count_click: bool) -> Result<Option<String>, StoreError>;
}

const SHORT_LINK_COLUMNS: &str =
    "code, original_url, normalized_url, click_count, created_at, updated_at";

pub struct PgLinkStore {
    db_connection_pool: PgPool,
    timeout_ms: u64,
}

impl PgLinkStore {
    pub fn new(db_connection_pool: PgPool, timeout_ms: u64) -> Self {
        Self {
            db_connection_pool,
            timeout_ms,
        }
    }
}

#[async_trait]
impl LinkStore for PgLinkStore {
    async fn find_by_normalized_url(
        &self,
        normalized_url: &str,
    ) -> Result<Option<ShortLink>, StoreError> {
        let query = format!("select {SHORT_LINK_COLUMNS} from short_links where normalized_url = $1");
        with_timeout(
            self.timeout_ms,
            sqlx::query_as::<_, ShortLink>(&query)
                .bind(normalized_url)
                .fetch_optional(&self.db_connection_pool),
        )
        .await
    }

    async fn insert(
        &self,
        code: &str,
        original_url: &str,
        normalized_url: &str,
    ) -> Result<InsertOutcome, StoreError> {
        let result = with_timeout(
            self.timeout_ms,
            sqlx::query(
                r#"
                  insert into short_links(code, original_url, normalized_url) values ($1, $2, $3)
                  on conflict (normalized_url) do nothing
                "#,
            )
            .bind(code)
            .bind(original_url)
            .bind(normalized_url)
            .execute(&self.db_connection_pool),
        )
        .await;
        match result {
            Ok(done) if done.rows_affected() == 0 => Ok(InsertOutcome::UrlTaken),
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(StoreError::Database(Error::Database(db_err)))
                if db_err.kind() == ErrorKind::UniqueViolation =>
            {
                Ok(InsertOutcome::CodeTaken)
            }
            Err(err) => Err(err),
        }
    }

    async fn resolve(&self, code: &str, count_click: bool) -> Result<Option<String>, StoreError> {
        let query = if count_click {
            r#"
              update short_links set click_count = click_count + 1, updated_at = now()
              where code = $1 returning original_url
            "#
        } else {
            "select original_url from short_links where code = $1"
        };
        with_timeout(
            self.timeout_ms,
            sqlx::query_scalar::<_, String>(query)
                .bind(code)
                .fetch_optional(&self.db_connection_pool),
        )
        .await
    }
}
