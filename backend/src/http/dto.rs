//! Data Transfer Objects for the HTTP API.
//!
//! The post object itself is [`crate::api::Post`]; only the wrappers that
//! exist purely for the wire format live here.

use serde::{Deserialize, Serialize};

pub use crate::api::{Post, PostFilter};
pub use super::error::ApiMessage;

/// Response for a successful update.
///
/// Deliberately differs from the create response, which returns the bare post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePostResponse {
    pub message: String,
    pub content: Post,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Crate version
    pub version: String,
    /// Database connection status
    pub database: String,
}
