//! JSON-schema validation of post payloads.
//!
//! Create and update requests share one schema: an object whose `title` and
//! `body` are both present and both strings. Extra properties are ignored.
//! The compiled validator is built once and reused for every request.

use std::sync::OnceLock;

use jsonschema::Validator;
use serde_json::{json, Value};

use crate::api::NewPost;

/// JSON Schema describing the structure of a post payload.
pub fn post_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": {"type": "string"},
            "body": {"type": "string"}
        },
        "required": ["title", "body"]
    })
}

static POST_VALIDATOR: OnceLock<Result<Validator, String>> = OnceLock::new();

fn post_validator() -> Result<&'static Validator, String> {
    POST_VALIDATOR
        .get_or_init(|| {
            jsonschema::validator_for(&post_schema())
                .map_err(|e| format!("Invalid post schema: {}", e))
        })
        .as_ref()
        .map_err(Clone::clone)
}

/// Outcome of a failed payload check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// The payload does not satisfy the schema; carries the validator's message.
    Invalid(String),
    /// The schema itself could not be compiled.
    Schema(String),
}

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadError::Invalid(msg) | PayloadError::Schema(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for PayloadError {}

/// Validate a decoded JSON payload against [`post_schema`].
///
/// On success the title and body are extracted into a [`NewPost`]. On failure
/// the first validation error's text is returned, for example
/// `"title" is a required property`.
pub fn validate_post_payload(payload: &Value) -> Result<NewPost, PayloadError> {
    let validator = post_validator().map_err(PayloadError::Schema)?;

    if let Some(error) = validator.iter_errors(payload).next() {
        return Err(PayloadError::Invalid(error.to_string()));
    }

    let field = |name: &str| {
        payload
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| PayloadError::Invalid(format!("\"{}\" is a required property", name)))
    };

    Ok(NewPost {
        title: field("title")?,
        body: field("body")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_payload() {
        let post = validate_post_payload(&json!({"title": "Hello", "body": "World"})).unwrap();
        assert_eq!(post, NewPost::new("Hello", "World"));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let post =
            validate_post_payload(&json!({"title": "a", "body": "b", "tags": ["x"]})).unwrap();
        assert_eq!(post.title, "a");
    }

    #[test]
    fn test_empty_strings_are_accepted() {
        assert!(validate_post_payload(&json!({"title": "", "body": ""})).is_ok());
    }

    #[test]
    fn test_missing_field_names_the_property() {
        let err = validate_post_payload(&json!({"body": "World"})).unwrap_err();
        match err {
            PayloadError::Invalid(msg) => assert!(msg.contains("title"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let err = validate_post_payload(&json!({"title": 32, "body": "World"})).unwrap_err();
        assert!(matches!(err, PayloadError::Invalid(_)));
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(validate_post_payload(&json!(["title", "body"])).is_err());
        assert!(validate_post_payload(&Value::Null).is_err());
    }
}
