use diesel::prelude::*;

use super::schema::posts;
use crate::api::{NewPost, Post, PostId};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PostRow {
    pub id: i64,
    pub title: String,
    pub body: String,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: PostId::new(row.id),
            title: row.title,
            body: row.body,
        }
    }
}

/// Insert and update payload; `id` is always left to the sequence.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = posts)]
pub struct PostChanges<'a> {
    pub title: &'a str,
    pub body: &'a str,
}

impl<'a> From<&'a NewPost> for PostChanges<'a> {
    fn from(post: &'a NewPost) -> Self {
        Self {
            title: &post.title,
            body: &post.body,
        }
    }
}
