/*
 * eval.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Dotted-path expression evaluation.

use crate::error::{RenderError, RenderResult};
use crate::value::Value;

/// Resolves a dotted path like `.report.findings` against a context value.
///
/// A leading dot refers to the context itself and empty segments are
/// skipped, so `.`, `""`, and `..a` are all accepted. One level of
/// indirection is removed before each lookup; the final value is returned
/// as-is (an optional stays an optional, which matters for truthiness).
/// Any segment that cannot be resolved, including a segment applied to a
/// scalar, fails with [`RenderError::FieldNotFound`].
pub fn evaluate_path<'a>(expr: &str, context: &'a Value) -> RenderResult<&'a Value> {
    let path = expr.trim();
    let mut current = context;
    for segment in path.split('.') {
        if segment.is_empty() {
            continue;
        }
        current = match current.dereference().get(segment) {
            Some(value) => value,
            None => {
                return Err(RenderError::FieldNotFound {
                    path: path.to_string(),
                    segment: segment.to_string(),
                });
            }
        };
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> Value {
        Value::from(json!({
            "a": { "b": 5 },
            "name": "weave",
            "empty": "",
        }))
    }

    #[test]
    fn test_nested_lookup() {
        assert_eq!(evaluate_path(".a.b", &context()).unwrap(), &Value::Int(5));
    }

    #[test]
    fn test_missing_field() {
        let err = evaluate_path(".missing", &context()).unwrap_err();
        assert!(matches!(
            err,
            RenderError::FieldNotFound { ref segment, .. } if segment == "missing"
        ));
    }

    #[test]
    fn test_missing_nested_field_reports_segment() {
        let err = evaluate_path(".a.nope", &context()).unwrap_err();
        assert!(matches!(
            err,
            RenderError::FieldNotFound { ref segment, .. } if segment == "nope"
        ));
    }

    #[test]
    fn test_segment_on_scalar_fails() {
        let err = evaluate_path(".name.length", &context()).unwrap_err();
        assert!(matches!(err, RenderError::FieldNotFound { .. }));
    }

    #[test]
    fn test_empty_segments_are_skipped() {
        let ctx = context();
        assert_eq!(evaluate_path("..a..b", &ctx).unwrap(), &Value::Int(5));
        assert_eq!(evaluate_path("a.b", &ctx).unwrap(), &Value::Int(5));
    }

    #[test]
    fn test_bare_dot_returns_context() {
        let ctx = context();
        assert_eq!(evaluate_path(".", &ctx).unwrap(), &ctx);
        assert_eq!(evaluate_path("", &ctx).unwrap(), &ctx);
    }

    #[test]
    fn test_indirection_is_dereferenced_before_lookup() {
        let mut inner = std::collections::HashMap::new();
        inner.insert("b".to_string(), Value::Int(9));
        let mut outer = std::collections::HashMap::new();
        outer.insert(
            "a".to_string(),
            Value::Optional(Some(Box::new(Value::Map(inner)))),
        );
        let ctx = Value::Map(outer);
        assert_eq!(evaluate_path(".a.b", &ctx).unwrap(), &Value::Int(9));
    }

    #[test]
    fn test_final_optional_not_unwrapped() {
        let mut outer = std::collections::HashMap::new();
        outer.insert(
            "flag".to_string(),
            Value::Optional(Some(Box::new(Value::Bool(false)))),
        );
        let ctx = Value::Map(outer);
        let value = evaluate_path(".flag", &ctx).unwrap();
        // The optional itself comes back, so presence still reads as truthy.
        assert!(value.is_truthy());
    }

    #[test]
    fn test_lookup_through_empty_optional_fails() {
        let mut outer = std::collections::HashMap::new();
        outer.insert("a".to_string(), Value::Optional(None));
        let ctx = Value::Map(outer);
        let err = evaluate_path(".a.b", &ctx).unwrap_err();
        assert!(matches!(err, RenderError::FieldNotFound { .. }));
    }
}
