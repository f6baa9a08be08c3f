// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reports and control messages on the wire

use crate::prelude::*;

#[test]
fn status_reaches_the_server() {
    let server = FakeServer::silent();
    cli()
        .args(&["-s", server.addr(), "--sender", "build01"])
        .args(&["status", "web01.disk", "-c", "red", "/var", "is", "97%", "full"])
        .passes()
        .stdout_eq("");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("status web01.disk red "), "{:?}", requests[0]);
    assert!(requests[0].contains(" Message generated by build01 at "), "{:?}", requests[0]);
    assert!(requests[0].ends_with("\n/var is 97% full"), "{:?}", requests[0]);
}

#[test]
fn status_color_comes_from_markers() {
    cli()
        .args(&["--dry-run", "status", "web01.disk", "&yellow", "almost", "full"])
        .passes()
        .stdout_has("status web01.disk yellow ");
}

#[test]
fn dry_run_prints_without_servers() {
    cli()
        .args(&["-n", "--sender", "", "status", "web01.cpu", "-c", "green", "--lifetime", "30m", "fine"])
        .passes()
        .stdout_has("status+30m web01.cpu green ")
        .stdout_has(" fine\n");
}

#[test]
fn every_configured_server_receives_the_message() {
    let first = FakeServer::silent();
    let second = FakeServer::silent();
    cli().args(&["-s", first.addr(), "-s", second.addr(), "enable", "web01.http"]).passes();

    assert_eq!(first.requests(), vec!["enable web01.http".to_string()]);
    assert_eq!(second.requests(), vec!["enable web01.http".to_string()]);
}

#[test]
fn servers_come_from_the_environment() {
    let server = FakeServer::silent();
    cli().env("XYMSRV", server.addr()).args(&["disable", "web01.*", "-1", "patching"]).passes();
    assert_eq!(server.requests(), vec!["disable web01.* -1 patching".to_string()]);
}

#[test]
fn invalid_color_exits_with_invalid_code() {
    cli().args(&["-n", "status", "web01.cpu", "-c", "orange", "text"]).exits(1).stderr_has("orange");
}

#[test]
fn invalid_target_never_connects() {
    let server = FakeServer::silent();
    cli().args(&["-s", server.addr(), "enable", "web01"]).exits(1);
    assert!(server.requests().is_empty());
}

#[test]
fn unreachable_server_exits_with_delivery_code() {
    let addr = closed_port();
    cli().args(&["-s", &addr, "--retries", "1", "enable", "web01.http"]).exits(2).stderr_has("refused");
}

#[test]
fn json_output_reports_each_server() {
    let server = FakeServer::silent();
    let run = cli().args(&["-s", server.addr(), "-o", "json", "drop", "web01", "cpu"]).passes();

    let json: serde_json::Value = serde_json::from_str(&run.stdout).unwrap();
    assert_eq!(json[0]["ok"], true);
    assert_eq!(json[0]["attempts"], 1);
    assert_eq!(server.requests(), vec!["drop web01 cpu".to_string()]);
}
