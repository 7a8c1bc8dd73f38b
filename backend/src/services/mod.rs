//! Service layer for business logic that does not touch the database.
//!
//! Database orchestration lives in `db::services`; this module holds the pure
//! checks those services run first.

pub mod validation;

pub use validation::{post_schema, validate_post_payload, PayloadError};
