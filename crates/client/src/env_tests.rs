// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serial_test::serial;

use super::*;

fn clear() {
    for var in ["XYMSRV", "XYMSERVERS", "XYMONDPORT", "XYMON_CLIENT_CONFIG"] {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn xymsrv_wins() {
    clear();
    std::env::set_var("XYMSRV", "xymon.example.net:1985");
    std::env::set_var("XYMSERVERS", "a b");
    assert_eq!(servers(), vec!["xymon.example.net:1985"]);
    clear();
}

#[test]
#[serial]
fn wildcard_xymsrv_falls_back_to_list() {
    clear();
    std::env::set_var("XYMSRV", "0.0.0.0");
    std::env::set_var("XYMSERVERS", "xymon1  xymon2,xymon3");
    assert_eq!(servers(), vec!["xymon1", "xymon2", "xymon3"]);
    clear();
}

#[test]
#[serial]
fn nothing_configured() {
    clear();
    assert!(servers().is_empty());
    assert_eq!(port(), None);
    assert_eq!(config_path(), None);
}

#[test]
#[serial]
fn port_must_parse() {
    clear();
    std::env::set_var("XYMONDPORT", "1985");
    assert_eq!(port(), Some(1985));
    std::env::set_var("XYMONDPORT", "http");
    assert_eq!(port(), None);
    clear();
}
