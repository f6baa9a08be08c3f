// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::MessageKind;

/// Permanent errors raised while building or parsing a message.
///
/// None of these are worth retrying: the same input always fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid color {0:?} (expected green, yellow, red, clear, blue or purple)")]
    InvalidColor(String),

    #[error("invalid target {value:?}: {reason}")]
    InvalidTarget { value: String, reason: &'static str },

    #[error("invalid {field} {value:?}: {reason}")]
    InvalidField { field: &'static str, value: String, reason: &'static str },

    #[error("invalid duration {0:?}")]
    InvalidPeriod(String),

    #[error("message is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    #[error("{0} messages cannot be part of a combo")]
    NotCombinable(MessageKind),

    #[error("combo message is empty")]
    EmptyCombo,

    #[error("combo limit {combo} is smaller than the message limit {message}")]
    InvalidLimits { message: usize, combo: usize },

    #[error("unrecognized message: {0:?}")]
    Unrecognized(String),
}

/// Check a field that travels as a single whitespace-delimited token.
pub(crate) fn check_token(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::InvalidField {
            field,
            value: value.to_string(),
            reason: "must not be empty",
        });
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidField {
            field,
            value: value.to_string(),
            reason: "must not contain whitespace",
        });
    }
    Ok(())
}

/// Check a field that must stay on the header line.
pub(crate) fn check_line(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.contains(['\n', '\r']) {
        return Err(ValidationError::InvalidField {
            field,
            value: value.to_string(),
            reason: "must not contain a line break",
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
