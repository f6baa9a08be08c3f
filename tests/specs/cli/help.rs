// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help and usage errors

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("status")
        .stdout_has("combo")
        .stdout_has("ghostlist");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn no_subcommand_is_a_usage_error() {
    cli().exits(3).stderr_has("Usage:");
}

#[test]
fn unknown_flag_is_a_usage_error() {
    cli().args(&["ping", "--frobnicate"]).exits(3);
}

#[test]
fn no_servers_is_a_config_error() {
    cli().args(&["ping"]).exits(3).stderr_has("no servers configured");
}

#[test]
fn missing_config_file_is_a_config_error() {
    cli().args(&["--config", "/nonexistent/xymon.toml", "ping"]).exits(3).stderr_has("cannot read");
}
