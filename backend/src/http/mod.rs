//! HTTP server module for the posts backend.
//!
//! This module provides an axum-based HTTP server that exposes post storage
//! as a JSON REST API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Content negotiation (Accept / Content-Type)            │
//! │  - JSON parsing and response shapes                       │
//! │  - CORS, compression, error handling                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (db::services)                             │
//! │  - Schema validation, then repository calls               │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                   │
//! │  - LocalRepository / PostgresRepository                   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Endpoints
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/api/posts` | 200, array of posts |
//! | POST | `/api/posts` | 201, post + `Location` |
//! | GET | `/api/posts/{id}` | 200, post |
//! | PUT | `/api/posts/{id}` | 200, `{message, content}` + `Location` |
//! | DELETE | `/api/posts/{id}` | 200, `{message}` |
//! | GET | `/health` | 200, health status |

pub mod dto;
pub mod error;
pub mod handlers;
pub mod negotiation;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
