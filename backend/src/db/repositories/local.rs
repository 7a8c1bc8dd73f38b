//! In-memory repository for unit testing and local development.
//!
//! Posts live in a `BTreeMap` keyed by id, so iteration order is already the
//! ascending-id order the list endpoint requires. Every mutation happens under
//! one write lock, which makes it atomic with respect to other requests.

use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use std::collections::BTreeMap;

use crate::api::{NewPost, Post, PostFilter, PostId};
use crate::db::repository::{PostRepository, RepositoryError, RepositoryResult};

#[derive(Debug)]
struct LocalData {
    posts: BTreeMap<PostId, Post>,
    next_id: i64,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            posts: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// In-memory [`PostRepository`].
#[derive(Debug, Default)]
pub struct LocalRepository {
    data: RwLock<LocalData>,
}

impl LocalRepository {
    /// Create an empty repository. The first post gets id 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored posts.
    pub fn len(&self) -> usize {
        self.data.read().posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PostRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn list_posts(&self, filter: &PostFilter) -> RepositoryResult<Vec<Post>> {
        let data = self.data.read();
        Ok(data
            .posts
            .values()
            .filter(|post| filter.matches(post))
            .cloned()
            .collect())
    }

    async fn get_post(&self, id: PostId) -> RepositoryResult<Post> {
        self.data
            .read()
            .posts
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::post_not_found("get_post", id))
    }

    async fn create_post(&self, post: &NewPost) -> RepositoryResult<Post> {
        let mut data = self.data.write();
        let id = PostId::new(data.next_id);
        data.next_id += 1;

        let stored = post.clone().into_post(id);
        data.posts.insert(id, stored.clone());
        debug!("Stored post {} in local repository", id);
        Ok(stored)
    }

    async fn update_post(&self, id: PostId, post: &NewPost) -> RepositoryResult<Post> {
        let mut data = self.data.write();
        let stored = data
            .posts
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::post_not_found("update_post", id))?;

        stored.title = post.title.clone();
        stored.body = post.body.clone();
        Ok(stored.clone())
    }

    async fn delete_post(&self, id: PostId) -> RepositoryResult<()> {
        self.data
            .write()
            .posts
            .remove(&id)
            .map(|_| debug!("Deleted post {} from local repository", id))
            .ok_or_else(|| RepositoryError::post_not_found("delete_post", id))
    }
}
