//! Error types for the edges of the simulation.
//!
//! The physics step itself never fails.  Errors only surface where outside
//! input enters the crate: tag construction, capacity-limited spawning, and
//! configuration loading.  Callers log them and carry on with a sane default
//! instead of panicking.

use std::fmt;

/// Top-level error enum for ballpit.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A body tag outside `[TAG_MIN, TAG_MAX]` was requested.
    InvalidTag {
        /// The rejected value.
        value: u8,
    },

    /// The body collection is at its configured capacity.
    CapacityReached {
        /// Configured `max_bodies`.
        limit: usize,
    },

    /// A configuration value failed validation.
    InvalidConfig {
        /// Config key (for logging).
        name: &'static str,
        /// The rejected value, rendered as text.
        value: String,
        /// Human-readable description of what is accepted.
        reason: &'static str,
    },

    /// The configuration file exists but is not valid TOML for [`crate::config::AppConfig`].
    ConfigParse {
        path: String,
        message: String,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidTag { value } => write!(
                f,
                "body tag {} is outside the range {}..={}",
                value,
                crate::constants::TAG_MIN,
                crate::constants::TAG_MAX
            ),
            SimError::CapacityReached { limit } => {
                write!(f, "body limit of {} reached; spawn rejected", limit)
            }
            SimError::InvalidConfig {
                name,
                value,
                reason,
            } => write!(f, "config '{}' = {} is invalid: {}", name, value, reason),
            SimError::ConfigParse { path, message } => {
                write!(f, "failed to parse {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_tag_message_names_range() {
        let msg = SimError::InvalidTag { value: 9 }.to_string();
        assert!(msg.contains('9'));
        assert!(msg.contains("1..=5"));
    }

    #[test]
    fn invalid_config_message_names_key() {
        let msg = SimError::InvalidConfig {
            name: "circle_sides",
            value: "2".to_string(),
            reason: "must be at least 3",
        }
        .to_string();
        assert!(msg.contains("circle_sides"));
        assert!(msg.contains("at least 3"));
    }

    #[test]
    fn capacity_message_names_limit() {
        let msg = SimError::CapacityReached { limit: 64 }.to_string();
        assert!(msg.contains("64"));
    }
}
