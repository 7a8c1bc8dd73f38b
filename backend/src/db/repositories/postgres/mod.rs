//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Automatic migration execution (creates the `posts` table)
//!
//! Settings come from [`PostgresConfig`].

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{debug, info};
use std::time::Duration;
use tokio::task;

use crate::api::{NewPost, Post, PostFilter, PostId};
use crate::db::postgres_config::PostgresConfig;
use crate::db::repository::{ErrorContext, PostRepository, RepositoryError, RepositoryResult};

mod models;
mod schema;

use models::*;
use schema::posts;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    ///
    /// # Returns
    /// * `Ok(PostgresRepository)` on success
    /// * `Err(RepositoryError)` if connection or migration fails
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)?;

        Self::run_migrations(&mut pool.get()?)?;
        info!(
            "Postgres repository ready (pool max={}, min={})",
            config.max_pool_size, config.min_pool_size
        );

        Ok(Self { pool, config })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Execute a database operation with automatic retry for transient failures.
    ///
    /// The operation is retried up to `max_retries` times when it fails with a
    /// retryable error, doubling the delay between attempts.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let outcome = pool
                    .get()
                    .map_err(RepositoryError::from)
                    .and_then(|mut conn| f.clone()(&mut conn));
                match outcome {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        debug!("Attempt {} failed, retrying: {}", attempt + 1, e);
                        last_error = Some(e);
                    }
                    Err(e) => return Err(e),
                }
            }

            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

/// Build a `LIKE` pattern that matches `needle` as a literal substring.
///
/// Postgres uses backslash as the default `LIKE` escape character.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl PostRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn list_posts(&self, filter: &PostFilter) -> RepositoryResult<Vec<Post>> {
        let filter = filter.clone();
        self.with_conn(move |conn| {
            let mut query = posts::table
                .select(PostRow::as_select())
                .order(posts::id.asc())
                .into_boxed();
            if let Some(needle) = filter.title() {
                query = query.filter(posts::title.like(like_pattern(needle)));
            }
            if let Some(needle) = filter.body() {
                query = query.filter(posts::body.like(like_pattern(needle)));
            }

            let rows = query.load::<PostRow>(conn).map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(Post::from).collect())
        })
        .await
    }

    async fn get_post(&self, id: PostId) -> RepositoryResult<Post> {
        self.with_conn(move |conn| {
            posts::table
                .find(id.value())
                .select(PostRow::as_select())
                .first::<PostRow>(conn)
                .optional()
                .map_err(map_diesel_error)?
                .map(Post::from)
                .ok_or_else(|| RepositoryError::post_not_found("get_post", id))
        })
        .await
    }

    async fn create_post(&self, post: &NewPost) -> RepositoryResult<Post> {
        let post = post.clone();
        self.with_conn(move |conn| {
            conn.transaction::<_, RepositoryError, _>(|tx| {
                let row = diesel::insert_into(posts::table)
                    .values(PostChanges::from(&post))
                    .returning(PostRow::as_returning())
                    .get_result::<PostRow>(tx)?;
                Ok(Post::from(row))
            })
        })
        .await
    }

    async fn update_post(&self, id: PostId, post: &NewPost) -> RepositoryResult<Post> {
        let post = post.clone();
        self.with_conn(move |conn| {
            conn.transaction::<_, RepositoryError, _>(|tx| {
                diesel::update(posts::table.find(id.value()))
                    .set(PostChanges::from(&post))
                    .returning(PostRow::as_returning())
                    .get_result::<PostRow>(tx)
                    .optional()?
                    .map(Post::from)
                    .ok_or_else(|| RepositoryError::post_not_found("update_post", id))
            })
        })
        .await
    }

    async fn delete_post(&self, id: PostId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            conn.transaction::<_, RepositoryError, _>(|tx| {
                let deleted = diesel::delete(posts::table.find(id.value())).execute(tx)?;
                if deleted == 0 {
                    return Err(RepositoryError::post_not_found("delete_post", id));
                }
                Ok(())
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("foo"), "%foo%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
