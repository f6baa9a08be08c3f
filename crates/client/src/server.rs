// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server addresses.

use std::fmt;
use std::str::FromStr;

use xymon_wire::DEFAULT_PORT;

use crate::ConfigError;

/// Host name (or address) and port of a Xymon server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerAddr {
    host: String,
    port: u16,
}

impl ServerAddr {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Parse `host`, `host:port`, `[v6]` or `[v6]:port`.
    pub fn parse_with_port(s: &str, default_port: u16) -> Result<Self, ConfigError> {
        let invalid = |reason: &'static str| ConfigError::InvalidServer { value: s.to_string(), reason };
        let s = s.trim();

        let (host, port) = if let Some(rest) = s.strip_prefix('[') {
            let (host, after) = rest.split_once(']').ok_or_else(|| invalid("unclosed bracket"))?;
            match after {
                "" => (host, None),
                _ => (host, Some(after.strip_prefix(':').ok_or_else(|| invalid("expected :port"))?)),
            }
        } else if s.matches(':').count() == 1 {
            let (host, port) = s.split_once(':').ok_or_else(|| invalid("expected :port"))?;
            (host, Some(port))
        } else {
            (s, None)
        };

        if host.is_empty() {
            return Err(invalid("host is empty"));
        }
        let port = match port {
            // "host:" falls back to the default, as a blank port did historically
            Some("") | None => default_port,
            Some(port) => port.parse().map_err(|_| invalid("port is not a number"))?,
        };
        Ok(Self { host: host.to_string(), port })
    }
}

impl FromStr for ServerAddr {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with_port(s, DEFAULT_PORT)
    }
}

impl fmt::Display for ServerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
