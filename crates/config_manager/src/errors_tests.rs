//! Unit tests for configuration error types.

use super::*;

#[test]
fn display_includes_field_value_and_message() {
    let err = ValidationError::new("require_approving_count", "-1", "approver count cannot be negative");
    let rendered = err.to_string();
    assert!(rendered.contains("require_approving_count"));
    assert!(rendered.contains("-1"));
    assert!(rendered.contains("approver count cannot be negative"));
}

#[test]
fn errors_with_same_content_are_equal() {
    let a = ValidationError::new("organization", "", "organization must be specified");
    let b = ValidationError::new("organization", "", "organization must be specified");
    assert_eq!(a, b);
}
