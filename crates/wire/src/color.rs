// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status colors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Severity attached to a status report.
///
/// Ordering follows severity: `clear < green < yellow < red`, with `blue`
/// (disabled) and `purple` (no report) ranked above every live state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Clear,
    Green,
    Yellow,
    Red,
    Blue,
    Purple,
}

impl Color {
    pub const ALL: [Color; 6] =
        [Color::Clear, Color::Green, Color::Yellow, Color::Red, Color::Blue, Color::Purple];

    pub fn as_str(self) -> &'static str {
        match self {
            Color::Clear => "clear",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Purple => "purple",
        }
    }

    /// Highest-severity `&color` marker found in a status text.
    ///
    /// Only the live states (`green`, `yellow`, `red`, `clear`) are recognized
    /// as markers. Returns `Color::Clear` when the text carries none.
    pub fn from_markers(text: &str) -> Color {
        const MARKERS: [Color; 4] = [Color::Green, Color::Yellow, Color::Red, Color::Clear];

        let mut highest: Option<Color> = None;
        for (idx, _) in text.match_indices('&') {
            let rest = &text[idx + 1..];
            let found = MARKERS.into_iter().find(|color| {
                rest.strip_prefix(color.as_str())
                    .is_some_and(|tail| !tail.starts_with(|c: char| c.is_alphanumeric() || c == '_'))
            });
            if let Some(color) = found {
                highest = Some(highest.map_or(color, |h| h.max(color)));
            }
        }
        highest.unwrap_or(Color::Clear)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidColor(s.to_string()))
    }
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
