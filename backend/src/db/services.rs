//! High-level post operations that work with any repository implementation.
//!
//! Handlers call these instead of the repository directly. Mutating services
//! take the raw JSON payload so that schema validation always happens before
//! the store is consulted: an invalid update to a missing post is a validation
//! failure, not a not-found.

use log::{debug, info};
use serde_json::Value;

use crate::api::{Post, PostFilter, PostId};
use crate::db::repository::{ErrorContext, PostRepository, RepositoryError, RepositoryResult};
use crate::services::validation::{validate_post_payload, PayloadError};

fn payload_error(operation: &str, err: PayloadError) -> RepositoryError {
    match err {
        PayloadError::Invalid(msg) => RepositoryError::validation_with_context(
            msg,
            ErrorContext::new(operation).with_entity("post"),
        ),
        PayloadError::Schema(msg) => {
            RepositoryError::internal_with_context(msg, ErrorContext::new(operation))
        }
    }
}

/// Check that the repository's backing store is reachable.
pub async fn health_check<R: PostRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// List posts matching `filter`, ordered by ascending id.
pub async fn list_posts<R: PostRepository + ?Sized>(
    repo: &R,
    filter: &PostFilter,
) -> RepositoryResult<Vec<Post>> {
    let posts = repo.list_posts(filter).await?;
    debug!("Listed {} posts (filter={:?})", posts.len(), filter);
    Ok(posts)
}

/// Fetch one post by id.
pub async fn get_post<R: PostRepository + ?Sized>(repo: &R, id: PostId) -> RepositoryResult<Post> {
    repo.get_post(id).await
}

/// Validate `payload` and store it as a new post.
pub async fn create_post<R: PostRepository + ?Sized>(
    repo: &R,
    payload: &Value,
) -> RepositoryResult<Post> {
    let new_post = validate_post_payload(payload).map_err(|e| payload_error("create_post", e))?;
    let post = repo.create_post(&new_post).await?;
    info!("Created post {}", post.id);
    Ok(post)
}

/// Validate `payload`, then replace the title and body of post `id`.
pub async fn update_post<R: PostRepository + ?Sized>(
    repo: &R,
    id: PostId,
    payload: &Value,
) -> RepositoryResult<Post> {
    let new_post = validate_post_payload(payload).map_err(|e| payload_error("update_post", e))?;
    let post = repo.update_post(id, &new_post).await?;
    info!("Updated post {}", post.id);
    Ok(post)
}

/// Permanently delete post `id`.
pub async fn delete_post<R: PostRepository + ?Sized>(repo: &R, id: PostId) -> RepositoryResult<()> {
    repo.delete_post(id).await?;
    info!("Deleted post {}", id);
    Ok(())
}
