// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::CommandFactory;
use serial_test::serial;

use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("xymon-client").chain(args.iter().copied())).unwrap()
}

fn clear_env() {
    for var in ["XYMSRV", "XYMSERVERS", "XYMONDPORT", "XYMON_CLIENT_CONFIG"] {
        std::env::remove_var(var);
    }
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn global_flags_work_after_the_subcommand() {
    let cli = parse(&["status", "web01.disk", "-c", "red", "full", "-s", "xymon:1985", "-n", "-vv"]);
    assert_eq!(cli.servers, vec!["xymon:1985"]);
    assert!(cli.dry_run);
    assert_eq!(cli.verbose, 2);
    assert!(matches!(cli.command, Commands::Send(send::SendCommand::Status { .. })));
}

#[test]
fn disable_accepts_minus_one() {
    let cli = parse(&["disable", "web01.disk", "-1", "until", "fixed"]);
    let Commands::Send(send::SendCommand::Disable { duration, text, .. }) = cli.command else {
        panic!("expected disable");
    };
    assert_eq!(duration, "-1");
    assert_eq!(text, vec!["until", "fixed"]);
}

#[test]
fn query_commands_are_top_level() {
    let cli = parse(&["board", "color=red", "--fields", "hostname,testname"]);
    let Commands::Query(query::QueryCommand::Board { criteria, fields }) = cli.command else {
        panic!("expected board");
    };
    assert_eq!(criteria, vec!["color=red"]);
    assert_eq!(fields, vec!["hostname", "testname"]);
}

#[test]
fn quiet_conflicts_with_verbose() {
    assert!(Cli::try_parse_from(["xymon-client", "-q", "-v", "ping"]).is_err());
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let err = Cli::try_parse_from(["xymon-client", "frobnicate"]).unwrap_err();
    assert!(err.use_stderr());
}

#[test]
#[serial]
fn flags_override_environment() {
    clear_env();
    std::env::set_var("XYMSRV", "env.example");
    std::env::set_var("XYMON_CLIENT_CONFIG", "/nonexistent/config.toml");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "servers = [\"file.example\"]\nmax_attempts = 5\n").unwrap();
    let path = path.to_string_lossy().into_owned();

    let from_env = load_config(&parse(&["--config", &path, "ping"])).unwrap();
    assert_eq!(from_env.servers, vec!["env.example"]);
    assert_eq!(from_env.max_attempts, 5);

    let from_flags = load_config(&parse(&[
        "--config", &path, "-s", "flag.example", "--port", "2000", "--timeout", "3", "--retries", "1", "ping",
    ]))
    .unwrap();
    clear_env();

    assert_eq!(from_flags.servers, vec!["flag.example"]);
    assert_eq!(from_flags.port, 2000);
    assert_eq!(from_flags.read_timeout_ms, 3000);
    assert_eq!(from_flags.max_attempts, 1);
}

#[test]
#[serial]
fn missing_explicit_config_is_a_usage_error() {
    clear_env();
    let err = load_config(&parse(&["--config", "/nonexistent/config.toml", "ping"])).unwrap_err();
    assert_eq!(err.code, codes::USAGE);
}

#[test]
#[serial]
fn sender_flag_overrides_host_name() {
    clear_env();
    let config = load_config(&parse(&["--sender", "build01", "ping"])).unwrap();
    assert_eq!(config.sender_name().as_deref(), Some("build01"));

    let config = load_config(&parse(&["--sender", "", "ping"])).unwrap();
    assert_eq!(config.sender_name(), None);
}
