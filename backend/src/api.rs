//! Public API surface for the posts backend.
//!
//! This file consolidates the domain types shared by the repository layer and
//! the HTTP API. All types derive Serialize/Deserialize for JSON serialization.

use serde::{Deserialize, Serialize};

/// Post identifier (database primary key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PostId(pub i64);

impl PostId {
    pub fn new(value: i64) -> Self {
        PostId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored post.
///
/// Serializes as `{"id": int, "title": string, "body": string}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
}

/// Title and body of a post that passed schema validation.
///
/// Used both for inserts and for wholesale replacement on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub body: String,
}

impl NewPost {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Attach a store-assigned id.
    pub fn into_post(self, id: PostId) -> Post {
        Post {
            id,
            title: self.title,
            body: self.body,
        }
    }
}

/// Substring filters for listing posts.
///
/// Both filters are case-sensitive and combined with AND. Empty strings are
/// treated the same as a missing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFilter {
    #[serde(default)]
    pub title_like: Option<String>,
    #[serde(default)]
    pub body_like: Option<String>,
}

impl PostFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title_like(mut self, needle: impl Into<String>) -> Self {
        self.title_like = Some(needle.into());
        self
    }

    pub fn with_body_like(mut self, needle: impl Into<String>) -> Self {
        self.body_like = Some(needle.into());
        self
    }

    /// Build a filter from decoded query-string pairs.
    ///
    /// A repeated key keeps its first value; unknown keys are ignored.
    pub fn from_query_pairs<K, V, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut filter = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "title_like" => &mut filter.title_like,
                "body_like" => &mut filter.body_like,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        filter
    }

    /// Title needle, if one is set and non-empty.
    pub fn title(&self) -> Option<&str> {
        self.title_like.as_deref().filter(|s| !s.is_empty())
    }

    /// Body needle, if one is set and non-empty.
    pub fn body(&self) -> Option<&str> {
        self.body_like.as_deref().filter(|s| !s.is_empty())
    }

    /// Check a post against both filters.
    pub fn matches(&self, post: &Post) -> bool {
        self.title().map_or(true, |n| post.title.contains(n))
            && self.body().map_or(true, |n| post.body.contains(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: i64, title: &str, body: &str) -> Post {
        NewPost::new(title, body).into_post(PostId::new(id))
    }

    #[test]
    fn test_post_serializes_flat_id() {
        let json = serde_json::to_value(post(1, "Hello", "World")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "title": "Hello", "body": "World"})
        );
    }

    #[test]
    fn test_filter_empty_matches_everything() {
        let filter = PostFilter::new().with_title_like("").with_body_like("");
        assert!(filter.matches(&post(1, "a", "b")));
        assert_eq!(filter.title(), None);
    }

    #[test]
    fn test_filter_is_case_sensitive_and_combined() {
        let filter = PostFilter::new().with_title_like("foo").with_body_like("bar");
        assert!(filter.matches(&post(1, "a foo b", "xbarx")));
        assert!(!filter.matches(&post(2, "a Foo b", "xbarx")));
        assert!(!filter.matches(&post(3, "foo", "baz")));
    }

    #[test]
    fn test_filter_from_query_pairs_keeps_first_value() {
        let filter = PostFilter::from_query_pairs([
            ("title_like", "foo"),
            ("page", "2"),
            ("title_like", "bar"),
            ("body_like", "baz"),
        ]);
        assert_eq!(filter, PostFilter::new().with_title_like("foo").with_body_like("baz"));
    }
}
