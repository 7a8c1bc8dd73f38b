//! # Posts API
//!
//! A JSON REST API for managing posts (title + body records).
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Domain types shared by every layer (`Post`, `PostId`, `PostFilter`)
//! - [`services`]: JSON-schema validation of post payloads
//! - [`db`]: Repository pattern, storage backends and the service layer
//! - [`http`]: Axum-based HTTP server, content negotiation and handlers
//!
//! Storage backends are selected with Cargo features: `local-repo` (in-memory,
//! default) and `postgres-repo` (Diesel).

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
