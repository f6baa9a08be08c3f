// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queries and how their replies are printed

use crate::prelude::*;

#[test]
fn ping_prints_the_version() {
    let server = FakeServer::replying("xymond 4.3.30\n");
    cli().args(&["-s", server.addr(), "ping"]).passes().stdout_eq("xymond 4.3.30\n");
    assert_eq!(server.requests(), vec!["ping".to_string()]);
}

#[test]
fn board_prints_rows() {
    let server = FakeServer::replying("web01|disk|red\nweb02|disk|green\n");
    cli()
        .args(&["-s", server.addr(), "board", "color=red,green", "--fields", "hostname,testname,color"])
        .passes()
        .stdout_eq("web01|disk|red\nweb02|disk|green\n");
    assert_eq!(server.requests(), vec!["xymondboard color=red,green fields=hostname,testname,color".to_string()]);
}

#[test]
fn empty_reply_exits_with_invalid_code() {
    let server = FakeServer::silent();
    cli().args(&["-s", server.addr(), "query", "web01.disk"]).exits(1).stderr_has("no data");
}

#[test]
fn several_servers_are_labelled() {
    let first = FakeServer::replying("4.3.30\n");
    let second = FakeServer::replying("4.3.28\n");
    cli()
        .args(&["-s", first.addr(), "-s", second.addr(), "ping"])
        .passes()
        .stdout_eq(&format!("== {} ==\n4.3.30\n== {} ==\n4.3.28\n", first.addr(), second.addr()));
}
