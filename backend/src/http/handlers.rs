//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to
//! `db::services` for validation and storage. Content negotiation has already
//! run by the time a handler is called.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

use super::dto::{ApiMessage, HealthResponse, Post, PostFilter, UpdatePostResponse};
use super::error::AppError;
use super::state::AppState;
use crate::api::PostId;
use crate::db::services as db_services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// URL of the single-post endpoint, used for `Location` headers.
pub fn post_location(id: PostId) -> String {
    format!("/api/posts/{}", id)
}

/// Path ids are unsigned decimal digits only; anything else names no post.
fn parse_post_id(raw: &str) -> Result<PostId, AppError> {
    let not_found = || AppError::NotFound(format!("Could not find post with id {}", raw));
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_found());
    }
    raw.parse::<i64>().map(PostId::new).map_err(|_| not_found())
}

fn parse_json_body(body: &Bytes) -> Result<Value, AppError> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Malformed JSON body: {}", e)))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and database is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Posts
// =============================================================================

/// GET /api/posts?title_like=&body_like=
///
/// List posts ordered by id, optionally filtered by substring. A repeated
/// filter parameter uses its first value.
pub async fn list_posts(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> HandlerResult<Vec<Post>> {
    let Query(pairs) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let filter = PostFilter::from_query_pairs(pairs);
    let posts = db_services::list_posts(state.repository.as_ref(), &filter).await?;
    Ok(Json(posts))
}

/// GET /api/posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> HandlerResult<Post> {
    let id = parse_post_id(&raw_id)?;
    let post = db_services::get_post(state.repository.as_ref(), id).await?;
    Ok(Json(post))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> HandlerResult<ApiMessage> {
    let id = parse_post_id(&raw_id)?;
    db_services::delete_post(state.repository.as_ref(), id).await?;
    Ok(Json(ApiMessage::new(format!(
        "Post #{} successfully deleted",
        id
    ))))
}

/// POST /api/posts
///
/// Create a post. Responds 201 with the stored post and a `Location` header.
pub async fn create_post(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let payload = parse_json_body(&body)?;
    let post = db_services::create_post(state.repository.as_ref(), &payload).await?;
    tracing::info!(post_id = %post.id, "Post created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, post_location(post.id))],
        Json(post),
    ))
}

/// PUT /api/posts/{id}
///
/// Replace a post's title and body. The payload is validated before the
/// post is looked up.
pub async fn update_post(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_post_id(&raw_id)?;
    let payload = parse_json_body(&body)?;
    let post = db_services::update_post(state.repository.as_ref(), id, &payload).await?;
    tracing::info!(post_id = %post.id, "Post updated");

    Ok((
        StatusCode::OK,
        [(header::LOCATION, post_location(post.id))],
        Json(UpdatePostResponse {
            message: format!("Post #{} successfully updated", id),
            content: post,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_location() {
        assert_eq!(post_location(PostId::new(7)), "/api/posts/7");
    }

    #[test]
    fn test_non_integer_id_is_not_found() {
        assert!(matches!(parse_post_id("abc"), Err(AppError::NotFound(_))));
        assert_eq!(parse_post_id("12").unwrap(), PostId::new(12));
    }

    #[test]
    fn test_signed_or_padded_id_is_not_found() {
        for raw in ["+5", "-1", " 5", "5 ", ""] {
            assert!(
                matches!(parse_post_id(raw), Err(AppError::NotFound(_))),
                "{raw:?} should not resolve to a post"
            );
        }
        assert_eq!(parse_post_id("007").unwrap(), PostId::new(7));
    }

    #[test]
    fn test_malformed_body_is_bad_request() {
        let body = Bytes::from_static(b"{not json");
        assert!(matches!(parse_json_body(&body), Err(AppError::BadRequest(_))));
    }
}
