// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batched statuses read from stdin

use crate::prelude::*;

const LINES: &str = "\
# morning run
web01.cpu green load 0.12
web01.disk red /var is full
";

#[test]
fn statuses_go_out_as_one_combo() {
    let server = FakeServer::silent();
    cli().args(&["-s", server.addr(), "combo"]).stdin(LINES).passes();

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("combo\nstatus web01.cpu green "), "{:?}", requests[0]);
    assert!(requests[0].contains("\n\nstatus web01.disk red "), "{:?}", requests[0]);
}

#[test]
fn dry_run_prints_the_combo() {
    cli().args(&["-n", "combo"]).stdin(LINES).passes().stdout_has("combo\nstatus web01.cpu green ");
}

#[test]
fn bad_line_names_its_number() {
    cli().args(&["-n", "combo"]).stdin("web01.cpu green ok\nweb01 red\n").exits(1).stderr_has("line 2:");
}
