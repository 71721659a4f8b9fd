//! Task name validation
//!
//! Checked on every keystroke of the creation field for live feedback,
//! and again as the gate before a task is committed.

use thiserror::Error;

/// Minimum task name length, in characters.
pub const NAME_MIN_CHARS: usize = 2;
/// Maximum task name length, in characters.
pub const NAME_MAX_CHARS: usize = 32;

/// Name length out of bounds. The `Display` text is the user-visible
/// message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("task name must be between 2 and 32 characters")]
pub struct NameLengthError;

/// Validate a candidate task name. Length is counted in characters, not
/// bytes, so multi-byte names are measured the way the user sees them.
pub fn validate_name(name: &str) -> Result<(), NameLengthError> {
    let len = name.chars().count();
    if (NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
        Ok(())
    } else {
        Err(NameLengthError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_bounds() {
        assert!(validate_name("x").is_err());
        assert!(validate_name("ok").is_ok());
        assert!(validate_name(&"a".repeat(32)).is_ok());
        assert!(validate_name(&"a".repeat(33)).is_err());
        assert!(validate_name("").is_err());
    }

    #[test]
    fn test_validate_name_counts_chars_not_bytes() {
        // Two characters, six bytes
        assert!(validate_name("掃除").is_ok());
        // One character, three bytes
        assert!(validate_name("犬").is_err());
    }

    #[test]
    fn test_error_message_non_empty() {
        let msg = NameLengthError.to_string();
        assert!(!msg.is_empty());
    }
}
