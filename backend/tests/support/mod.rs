#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

/// Guard form of [`with_scoped_env`] for async tests that await while the
/// variables are set. Restores the variables, then releases the lock.
pub struct EnvGuard {
    _env: ScopedEnv,
    _lock: MutexGuard<'static, ()>,
}

pub fn lock_env(changes: &[(&str, Option<&str>)]) -> EnvGuard {
    let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    EnvGuard {
        _env: ScopedEnv::new(changes),
        _lock: lock,
    }
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

#[cfg(feature = "http-server")]
pub use app::*;

#[cfg(feature = "http-server")]
mod app {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, HeaderMap, Method, Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    use posts_api::api::{NewPost, Post};
    use posts_api::db::repositories::LocalRepository;
    use posts_api::db::repository::PostRepository;
    use posts_api::http::{create_router, AppState};

    /// Router backed by a fresh in-memory repository, plus a handle on that repository.
    pub fn test_app() -> (Router, Arc<LocalRepository>) {
        let repo = Arc::new(LocalRepository::new());
        let router = create_router(AppState::new(repo.clone()));
        (router, repo)
    }

    /// Store posts directly, bypassing HTTP.
    pub async fn seed(repo: &LocalRepository, posts: &[(&str, &str)]) -> Vec<Post> {
        let mut stored = Vec::new();
        for (title, body) in posts {
            stored.push(repo.create_post(&NewPost::new(*title, *body)).await.unwrap());
        }
        stored
    }

    /// A decoded response.
    pub struct TestResponse {
        pub status: StatusCode,
        pub headers: HeaderMap,
        pub json: Value,
    }

    impl TestResponse {
        pub fn message(&self) -> &str {
            self.json["message"].as_str().unwrap_or_default()
        }

        pub fn location(&self) -> Option<&str> {
            self.headers
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
        }
    }

    pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        TestResponse {
            status,
            headers,
            json,
        }
    }

    /// Request with `Accept: application/json` and no body.
    pub fn json_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::ACCEPT, "application/json")
            .body(Body::empty())
            .unwrap()
    }

    /// Request with JSON accept and content type headers and a JSON body.
    pub fn json_body_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }
}
