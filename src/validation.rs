use crate::error::{Error, Result};

const MAX_PATTERN_LEN: usize = 1024;

/// Validates a search pattern before passing it to the engine subprocess.
///
/// Accepted patterns:
/// - Non-empty, at most 1024 bytes
/// - No control characters (including newlines and NUL)
///
/// Anything else the engine is free to interpret as a name, email
/// address, or key ID fragment. Returns the pattern on success.
pub fn validate_pattern(pattern: &str) -> Result<&str> {
    if pattern.is_empty() {
        return Err(Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: "search pattern cannot be empty".to_string(),
        });
    }

    if pattern.len() > MAX_PATTERN_LEN {
        return Err(Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: format!(
                "search pattern exceeds {} bytes (got {})",
                MAX_PATTERN_LEN,
                pattern.len()
            ),
        });
    }

    if pattern.chars().any(char::is_control) {
        return Err(Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: "search pattern must not contain control characters".to_string(),
        });
    }

    Ok(pattern)
}
