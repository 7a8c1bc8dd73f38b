//! Content negotiation for the JSON-only API.
//!
//! Every post route requires the client to accept `application/json`;
//! routes with a request body additionally require it to be sent as
//! `application/json`. The `Accept` check runs first.

use axum::{
    extract::Request,
    http::{header, HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::error::AppError;

pub const JSON_MIME: &str = "application/json";

const NOT_ACCEPTABLE_MESSAGE: &str = "Request must accept application/json data";
const UNSUPPORTED_MESSAGE: &str = "Request must contain application/json data";

/// Middleware enforcing JSON `Accept` and `Content-Type` headers.
pub async fn negotiate_json(request: Request, next: Next) -> Response {
    if let Err(err) = check_request(request.method(), request.headers()) {
        tracing::debug!(
            method = %request.method(),
            uri = %request.uri(),
            "Rejected by content negotiation: {:?}",
            err
        );
        return err.into_response();
    }
    next.run(request).await
}

fn check_request(method: &Method, headers: &HeaderMap) -> Result<(), AppError> {
    let accept = headers
        .get(header::ACCEPT)
        .map(|v| v.to_str().unwrap_or_default());
    if !accepts_json(accept) {
        return Err(AppError::NotAcceptable(NOT_ACCEPTABLE_MESSAGE.to_string()));
    }

    if has_body(method) {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        if !is_json_content_type(content_type) {
            return Err(AppError::UnsupportedMediaType(UNSUPPORTED_MESSAGE.to_string()));
        }
    }

    Ok(())
}

fn has_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT)
}

/// Decide whether an `Accept` header value admits `application/json`.
///
/// A missing or blank header accepts anything. Otherwise at least one media
/// range must be `application/json`, `application/*` or `*/*` with a
/// non-zero `q`.
pub fn accepts_json(accept: Option<&str>) -> bool {
    let accept = match accept.map(str::trim) {
        None | Some("") => return true,
        Some(value) => value,
    };

    accept.split(',').any(|range| {
        let mut parts = range.split(';');
        let media = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
        let matches = matches!(media.as_str(), "application/json" | "application/*" | "*/*");
        matches && quality(parts) > 0.0
    })
}

fn quality<'a>(params: impl Iterator<Item = &'a str>) -> f32 {
    for param in params {
        if let Some((key, value)) = param.split_once('=') {
            if key.trim().eq_ignore_ascii_case("q") {
                return value.trim().parse().unwrap_or(0.0);
            }
        }
    }
    1.0
}

/// Decide whether a `Content-Type` header value is `application/json`,
/// ignoring parameters such as `charset`.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case(JSON_MIME))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_missing_accept_is_allowed() {
        assert!(accepts_json(None));
        assert!(accepts_json(Some("  ")));
    }

    #[test]
    fn test_accept_ranges() {
        assert!(accepts_json(Some("application/json")));
        assert!(accepts_json(Some("text/html, application/json;q=0.9")));
        assert!(accepts_json(Some("*/*")));
        assert!(accepts_json(Some("Application/*")));
        assert!(!accepts_json(Some("text/html")));
        assert!(!accepts_json(Some("application/xml")));
    }

    #[test]
    fn test_zero_quality_rejects() {
        assert!(!accepts_json(Some("application/json;q=0")));
        assert!(!accepts_json(Some("application/json; q=0.0, text/html")));
    }

    #[test]
    fn test_content_type() {
        assert!(is_json_content_type(Some("application/json")));
        assert!(is_json_content_type(Some("application/json; charset=utf-8")));
        assert!(!is_json_content_type(Some("text/plain")));
        assert!(!is_json_content_type(None));
    }

    #[test]
    fn test_accept_checked_before_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(matches!(
            check_request(&Method::POST, &headers),
            Err(AppError::NotAcceptable(_))
        ));
    }

    #[test]
    fn test_content_type_only_checked_for_bodies() {
        let headers = HeaderMap::new();
        assert!(check_request(&Method::GET, &headers).is_ok());
        assert!(check_request(&Method::DELETE, &headers).is_ok());
        assert!(matches!(
            check_request(&Method::PUT, &headers),
            Err(AppError::UnsupportedMediaType(_))
        ));
    }
}
