// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.

use std::fmt;

use xymon_client::{ConfigError, DeliveryError};
use xymon_wire::ValidationError;

pub mod codes {
    /// Invalid input, or the server answered with nothing usable
    pub const INVALID: i32 = 1;
    /// The message could not be delivered within the retry budget
    pub const DELIVERY: i32 = 2;
    /// Bad command line or configuration
    pub const USAGE: i32 = 3;
}

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(codes::USAGE, message)
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

impl From<ValidationError> for ExitError {
    fn from(err: ValidationError) -> Self {
        Self::new(codes::INVALID, err.to_string())
    }
}

impl From<ConfigError> for ExitError {
    fn from(err: ConfigError) -> Self {
        Self::usage(err.to_string())
    }
}

impl From<&DeliveryError> for ExitError {
    fn from(err: &DeliveryError) -> Self {
        let code = if err.is_transient() { codes::DELIVERY } else { codes::INVALID };
        Self::new(code, err.to_string())
    }
}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
