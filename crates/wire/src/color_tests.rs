// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    clear  = { "clear",  Color::Clear },
    green  = { "green",  Color::Green },
    yellow = { "yellow", Color::Yellow },
    red    = { "red",    Color::Red },
    blue   = { "blue",   Color::Blue },
    purple = { "purple", Color::Purple },
)]
fn parses_every_color(name: &str, expected: Color) {
    assert_eq!(name.parse::<Color>().unwrap(), expected);
    assert_eq!(expected.to_string(), name);
}

#[yare::parameterized(
    uppercase = { "RED" },
    unknown   = { "orange" },
    empty     = { "" },
    padded    = { " red" },
)]
fn rejects_unknown_colors(name: &str) {
    assert_eq!(name.parse::<Color>(), Err(ValidationError::InvalidColor(name.to_string())));
}

#[test]
fn severity_ordering() {
    assert!(Color::Clear < Color::Green);
    assert!(Color::Green < Color::Yellow);
    assert!(Color::Yellow < Color::Red);
    assert!(Color::Red < Color::Blue);
    assert!(Color::Blue < Color::Purple);
}

#[yare::parameterized(
    no_markers       = { "all good",                                 Color::Clear },
    single_green     = { "&green ok",                                Color::Green },
    highest_wins     = { "&green ok\n&red disk full\n&yellow swap",  Color::Red },
    word_boundary    = { "&redundant array",                         Color::Clear },
    marker_at_end    = { "load &yellow",                             Color::Yellow },
    blue_not_marker  = { "&blue disabled",                           Color::Clear },
    clear_explicit   = { "&clear nothing to say",                    Color::Clear },
    punctuation_ends = { "&red: broken",                             Color::Red },
)]
fn markers(text: &str, expected: Color) {
    assert_eq!(Color::from_markers(text), expected);
}
