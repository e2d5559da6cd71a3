//! Field validators shared by the tracker and the meeting directory.
//!
//! Each returns `Some(message)` when the value is rejected, so callers can
//! collect several problems before failing.

/// Validate a required text field with a max length.
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate an optional text field with a max length (absent or empty is OK).
pub fn validate_optional(value: Option<&str>, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.map(str::trim).unwrap_or("");
    if !trimmed.is_empty() && trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate that an integer field is zero or greater.
pub fn validate_non_negative(value: i64, field_name: &str) -> Option<String> {
    if value < 0 {
        return Some(format!("{field_name} must not be negative"));
    }
    None
}
