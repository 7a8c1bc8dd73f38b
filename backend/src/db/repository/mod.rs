//! Repository trait for post storage.
//!
//! The HTTP layer only talks to [`PostRepository`], so the in-memory and
//! Postgres backends are interchangeable.

use async_trait::async_trait;

use crate::api::{NewPost, Post, PostFilter, PostId};

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Repository trait for post CRUD operations.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
///
/// # Atomicity
/// `create_post`, `update_post` and `delete_post` must each commit as a
/// single unit: either the whole write is visible afterwards or none of it is.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Check that the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// List posts matching `filter`, ordered by ascending id.
    ///
    /// # Arguments
    /// * `filter` - Case-sensitive substring filters on title and body
    ///
    /// # Returns
    /// * `Ok(Vec<Post>)` - Matching posts, possibly empty
    /// * `Err(RepositoryError)` - If the query fails
    async fn list_posts(&self, filter: &PostFilter) -> RepositoryResult<Vec<Post>>;

    /// Fetch a single post.
    ///
    /// # Returns
    /// * `Ok(Post)` - The stored post
    /// * `Err(RepositoryError::NotFound)` - If no post has this id
    async fn get_post(&self, id: PostId) -> RepositoryResult<Post>;

    /// Insert a new post and return it with its store-assigned id.
    ///
    /// Ids are never reused, so the returned id is strictly new.
    async fn create_post(&self, post: &NewPost) -> RepositoryResult<Post>;

    /// Replace the title and body of an existing post.
    ///
    /// # Returns
    /// * `Ok(Post)` - The post after the update
    /// * `Err(RepositoryError::NotFound)` - If no post has this id
    async fn update_post(&self, id: PostId, post: &NewPost) -> RepositoryResult<Post>;

    /// Permanently delete a post.
    ///
    /// # Returns
    /// * `Ok(())` - The post was removed
    /// * `Err(RepositoryError::NotFound)` - If no post has this id
    async fn delete_post(&self, id: PostId) -> RepositoryResult<()>;
}
