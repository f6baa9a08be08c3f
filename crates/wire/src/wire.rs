// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ASCII transfer encoding.
//!
//! The server only understands ASCII. Outbound characters beyond ASCII are
//! replaced with XML character references (`é` becomes `&#233;`); inbound bytes
//! beyond ASCII decode to U+FFFD.

use std::fmt::Write;

/// Encode text for the wire.
pub fn encode(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }
    let mut out = String::with_capacity(encoded_len(text));
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let _ = write!(out, "&#{};", u32::from(c));
        }
    }
    out
}

/// Byte length of `text` once encoded.
pub fn encoded_len(text: &str) -> usize {
    text.chars().map(|c| if c.is_ascii() { 1 } else { reference_len(c) }).sum()
}

/// Decode a reply received from the server.
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| if b.is_ascii() { char::from(b) } else { char::REPLACEMENT_CHARACTER }).collect()
}

fn reference_len(c: char) -> usize {
    // "&#" + decimal digits + ";"
    let mut n = u32::from(c);
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits + 3
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
