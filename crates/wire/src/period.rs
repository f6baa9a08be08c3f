// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifetimes and disable durations.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::ValidationError;

/// Unit suffix accepted by the server. A bare number means minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl Unit {
    fn suffix(self) -> char {
        match self {
            Unit::Seconds => 's',
            Unit::Minutes => 'm',
            Unit::Hours => 'h',
            Unit::Days => 'd',
            Unit::Weeks => 'w',
        }
    }

    fn from_suffix(c: char) -> Option<Self> {
        match c {
            's' => Some(Unit::Seconds),
            'm' => Some(Unit::Minutes),
            'h' => Some(Unit::Hours),
            'd' => Some(Unit::Days),
            'w' => Some(Unit::Weeks),
            _ => None,
        }
    }

    fn seconds(self) -> u64 {
        match self {
            Unit::Seconds => 1,
            Unit::Minutes => 60,
            Unit::Hours => 3600,
            Unit::Days => 86_400,
            Unit::Weeks => 604_800,
        }
    }
}

/// A positive duration as written on the wire, e.g. `30`, `30m`, `2h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    value: u32,
    unit: Option<Unit>,
}

impl Period {
    pub fn new(value: u32, unit: Unit) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::InvalidPeriod(format!("0{}", unit.suffix())));
        }
        Ok(Self { value, unit: Some(unit) })
    }

    pub fn minutes(value: u32) -> Result<Self, ValidationError> {
        Self::new(value, Unit::Minutes)
    }

    pub fn as_duration(&self) -> Duration {
        let unit = self.unit.unwrap_or(Unit::Minutes);
        Duration::from_secs(u64::from(self.value) * unit.seconds())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            Some(unit) => write!(f, "{}{}", self.value, unit.suffix()),
            None => write!(f, "{}", self.value),
        }
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidPeriod(s.to_string());
        let (digits, unit) = match s.chars().last() {
            Some(c) if c.is_ascii_alphabetic() => {
                (&s[..s.len() - 1], Some(Unit::from_suffix(c).ok_or_else(invalid)?))
            }
            _ => (s, None),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let value: u32 = digits.parse().map_err(|_| invalid())?;
        if value == 0 {
            return Err(invalid());
        }
        Ok(Self { value, unit })
    }
}

/// How long a `disable` lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisableFor {
    Period(Period),
    /// Until the test reports OK again (`-1` on the wire)
    UntilOk,
}

impl fmt::Display for DisableFor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisableFor::Period(period) => period.fmt(f),
            DisableFor::UntilOk => f.write_str("-1"),
        }
    }
}

impl FromStr for DisableFor {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-1" {
            return Ok(DisableFor::UntilOk);
        }
        s.parse().map(DisableFor::Period)
    }
}

impl From<Period> for DisableFor {
    fn from(period: Period) -> Self {
        DisableFor::Period(period)
    }
}

#[cfg(test)]
#[path = "period_tests.rs"]
mod tests;
