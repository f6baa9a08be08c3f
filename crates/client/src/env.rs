// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.

use std::path::PathBuf;

/// Server list: `XYMSRV`, then the space separated `XYMSERVERS`.
///
/// `XYMSRV=0.0.0.0` is the conventional "use XYMSERVERS" marker.
pub fn servers() -> Vec<String> {
    if let Ok(server) = std::env::var("XYMSRV") {
        let server = server.trim();
        if !server.is_empty() && server != "0.0.0.0" {
            return vec![server.to_string()];
        }
    }
    std::env::var("XYMSERVERS")
        .map(|list| list.split([' ', ',']).filter(|s| !s.is_empty()).map(str::to_string).collect())
        .unwrap_or_default()
}

/// Server port override
pub fn port() -> Option<u16> {
    std::env::var("XYMONDPORT").ok().and_then(|s| s.trim().parse::<u16>().ok())
}

/// Explicit config file location
pub fn config_path() -> Option<PathBuf> {
    std::env::var("XYMON_CLIENT_CONFIG").ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Per-user config file: `<config dir>/xymon-client/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("xymon-client").join("config.toml"))
}

/// Name of this machine, the default status sender
pub fn hostname() -> Option<String> {
    nix::unistd::gethostname().ok()?.into_string().ok().filter(|name| !name.is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
