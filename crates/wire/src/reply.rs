// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replies to query messages.
//!
//! Replies are plain text. An empty reply means the server holds nothing for
//! the request; structured replies use `|` separated columns, one row per line.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::wire;

/// Errors interpreting a reply
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyError {
    #[error("server returned no data")]
    NoData,

    #[error("malformed reply line {line:?}: {reason}")]
    Malformed { line: String, reason: String },
}

/// Decoded reply text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Reply(String);

impl Reply {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(wire::decode(bytes))
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    pub fn into_text(self) -> String {
        self.0
    }

    /// True when the reply carries nothing but whitespace.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Treat an empty reply as absent data.
    pub fn require(self) -> Result<Self, ReplyError> {
        if self.is_empty() {
            return Err(ReplyError::NoData);
        }
        Ok(self)
    }

    /// Split every non-empty line on `|`.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.0
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| line.split('|').map(str::to_string).collect())
            .collect()
    }

    /// Server version from a `ping` reply
    pub fn version(&self) -> &str {
        self.0.trim()
    }

    /// Parse a `ghostlist` reply.
    pub fn ghosts(&self) -> Result<Vec<Ghost>, ReplyError> {
        self.0.lines().filter(|line| !line.trim().is_empty()).map(Ghost::parse).collect()
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A system reporting to the server without being configured there
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ghost {
    pub hostname: String,
    pub address: String,
    /// Epoch seconds of the last report
    pub timestamp: i64,
}

impl Ghost {
    fn parse(line: &str) -> Result<Self, ReplyError> {
        let malformed = |reason: &str| ReplyError::Malformed {
            line: line.to_string(),
            reason: reason.to_string(),
        };
        let mut columns = line.splitn(3, '|');
        let (Some(hostname), Some(address), Some(timestamp)) =
            (columns.next(), columns.next(), columns.next())
        else {
            return Err(malformed("expected hostname|address|timestamp"));
        };
        let timestamp = timestamp.trim().parse().map_err(|_| malformed("timestamp is not a number"))?;
        Ok(Self { hostname: hostname.to_string(), address: address.to_string(), timestamp })
    }
}

impl fmt::Display for Ghost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.hostname, self.address, self.timestamp)
    }
}

#[cfg(test)]
#[path = "reply_tests.rs"]
mod tests;
