// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! Layers, lowest first: built-in defaults, a TOML file, then the classic
//! Xymon environment variables. Command-line flags are applied on top by the
//! binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use xymon_wire::{Limits, ValidationError, DEFAULT_PORT};

use crate::{env, Backoff, RetryPolicy, ServerAddr, Timeouts};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid server {value:?}: {reason}")]
    InvalidServer { value: String, reason: &'static str },

    #[error("no servers configured (set XYMSRV or XYMSERVERS, or pass --server)")]
    NoServers,

    #[error(transparent)]
    Limits(#[from] ValidationError),
}

/// Shape of the delay curve between retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffKind {
    Fixed,
    Linear,
    #[default]
    Exponential,
}

/// Everything the client can be configured with.
///
/// ```toml
/// servers = ["xymon1.example.com", "xymon2.example.com:1985"]
/// max_attempts = 5
/// backoff = "exponential"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// `host`, `host:port` or `[v6]:port`
    pub servers: Vec<String>,
    /// Port for servers given without one
    pub port: u16,
    pub connect_timeout_ms: u64,
    pub write_timeout_ms: u64,
    pub read_timeout_ms: u64,
    /// Total attempts per server, including the first
    pub max_attempts: u32,
    pub backoff: BackoffKind,
    /// First delay, and the step for linear backoff
    pub retry_delay_ms: u64,
    /// Cap for exponential backoff
    pub max_retry_delay_ms: u64,
    pub max_message: usize,
    pub max_combo: usize,
    /// Send to all servers concurrently
    pub parallel: bool,
    /// Read until the server closes, even for messages without a reply
    pub ack: bool,
    /// Named in a headline atop every status; the host name when unset,
    /// no headline when empty
    pub sender: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let timeouts = Timeouts::default();
        let limits = Limits::default();
        Self {
            servers: Vec::new(),
            port: DEFAULT_PORT,
            connect_timeout_ms: millis(timeouts.connect),
            write_timeout_ms: millis(timeouts.write),
            read_timeout_ms: millis(timeouts.read),
            max_attempts: RetryPolicy::default().max_attempts,
            backoff: BackoffKind::Exponential,
            retry_delay_ms: 1_000,
            max_retry_delay_ms: 30_000,
            max_message: limits.max_message,
            max_combo: limits.max_combo,
            parallel: false,
            ack: false,
            sender: None,
        }
    }
}

impl ClientConfig {
    /// Read a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Load the file named by `XYMON_CLIENT_CONFIG`, else the per-user file
    /// when present, else defaults. An explicitly named file must exist.
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::config_path() {
            return Self::load(&path);
        }
        match env::default_config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Apply `XYMSRV`/`XYMSERVERS` and `XYMONDPORT`.
    pub fn apply_env(mut self) -> Self {
        let servers = env::servers();
        if !servers.is_empty() {
            self.servers = servers;
        }
        if let Some(port) = env::port() {
            self.port = port;
        }
        self
    }

    /// Parsed server list; empty is an error.
    pub fn server_addrs(&self) -> Result<Vec<ServerAddr>, ConfigError> {
        if self.servers.is_empty() {
            return Err(ConfigError::NoServers);
        }
        self.servers.iter().map(|s| ServerAddr::parse_with_port(s, self.port)).collect()
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: Duration::from_millis(self.connect_timeout_ms),
            write: Duration::from_millis(self.write_timeout_ms),
            read: Duration::from_millis(self.read_timeout_ms),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let delay = Duration::from_millis(self.retry_delay_ms);
        let backoff = match self.backoff {
            BackoffKind::Fixed => Backoff::Fixed(delay),
            BackoffKind::Linear => Backoff::Linear { initial: delay, step: delay },
            BackoffKind::Exponential => Backoff::Exponential {
                initial: delay,
                max: Duration::from_millis(self.max_retry_delay_ms),
            },
        };
        RetryPolicy::new(self.max_attempts, backoff)
    }

    pub fn sender_name(&self) -> Option<String> {
        match self.sender.as_deref() {
            Some("") => None,
            Some(sender) => Some(sender.to_string()),
            None => env::hostname(),
        }
    }

    pub fn limits(&self) -> Result<Limits, ConfigError> {
        Ok(Limits::new(self.max_message, self.max_combo)?)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
