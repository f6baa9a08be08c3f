// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host and test identifiers.

use std::fmt;

use crate::ValidationError;

/// A monitored host, optionally narrowed to one of its tests.
///
/// Rendered as `host` or `host.test`. Host names may contain dots; the test
/// name may not, since the qualified form is split on its last dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    host: String,
    test: Option<String>,
}

impl Target {
    /// Target a whole host.
    pub fn host(host: impl Into<String>) -> Result<Self, ValidationError> {
        let host = host.into();
        check_host(&host)?;
        Ok(Self { host, test: None })
    }

    /// Target one test on a host.
    pub fn test(host: impl Into<String>, test: impl Into<String>) -> Result<Self, ValidationError> {
        let host = host.into();
        let test = test.into();
        check_host(&host)?;
        check_test(&test)?;
        Ok(Self { host, test: Some(test) })
    }

    /// Parse a qualified `host.test` token.
    pub fn parse_qualified(s: &str) -> Result<Self, ValidationError> {
        let (host, test) = s.rsplit_once('.').ok_or_else(|| ValidationError::InvalidTarget {
            value: s.to_string(),
            reason: "expected host.test",
        })?;
        Self::test(host, test)
    }

    pub fn host_name(&self) -> &str {
        &self.host
    }

    pub fn test_name(&self) -> Option<&str> {
        self.test.as_deref()
    }

    /// Require a test name, as status-like verbs do.
    pub(crate) fn require_test(&self) -> Result<&str, ValidationError> {
        self.test.as_deref().ok_or_else(|| ValidationError::InvalidTarget {
            value: self.host.clone(),
            reason: "a test name is required",
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.test {
            Some(test) => write!(f, "{}.{}", self.host, test),
            None => f.write_str(&self.host),
        }
    }
}

fn check_host(host: &str) -> Result<(), ValidationError> {
    if host.is_empty() {
        return Err(invalid(host, "host name is empty"));
    }
    if host.chars().any(char::is_whitespace) {
        return Err(invalid(host, "host name contains whitespace"));
    }
    Ok(())
}

fn check_test(test: &str) -> Result<(), ValidationError> {
    if test.is_empty() {
        return Err(invalid(test, "test name is empty"));
    }
    if test.chars().any(char::is_whitespace) {
        return Err(invalid(test, "test name contains whitespace"));
    }
    if test.contains('.') {
        return Err(invalid(test, "test name contains a dot"));
    }
    Ok(())
}

fn invalid(value: &str, reason: &'static str) -> ValidationError {
    ValidationError::InvalidTarget { value: value.to_string(), reason }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
