// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parsing wire text back into typed messages.

use std::str::FromStr;

use crate::{combo, Color, Message, Period, Query, Rename, Status, Target, ValidationError};

impl FromStr for Message {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (head, body) = match s.split_once('\n') {
            Some((head, body)) => (head, Some(body)),
            None => (s, None),
        };
        let (verb, _) = next_token(head);
        let base = verb.split(['+', '/']).next().unwrap_or_default();

        match base {
            "status" => parse_status(s).map(Message::Status),
            "combo" => {
                let members = combo::split_combo(body.unwrap_or_default())
                    .into_iter()
                    .map(str::parse)
                    .collect::<Result<Vec<Message>, _>>()?;
                if members.is_empty() {
                    return Err(ValidationError::EmptyCombo);
                }
                Ok(Message::Combo(members))
            }
            "notify" => {
                let (_, rest) = next_token(s);
                let (target, text) = next_token(rest);
                Ok(Message::Notify { target: Target::parse_qualified(target)?, text: text.to_string() })
            }
            "data" => {
                let [_, target] = exact_tokens(head)?;
                Ok(Message::Data {
                    target: Target::parse_qualified(target)?,
                    text: body.unwrap_or_default().to_string(),
                })
            }
            "client" => {
                let [_, host, section] = exact_tokens(head)?;
                Ok(Message::Client {
                    host: host.to_string(),
                    section: section.to_string(),
                    payload: body.unwrap_or_default().to_string(),
                })
            }
            "disable" => {
                let (_, rest) = next_token(s);
                let (target, rest) = next_token(rest);
                let (duration, text) = next_token(rest);
                Ok(Message::Disable {
                    target: Target::parse_qualified(target)?,
                    duration: duration.parse()?,
                    text: text.to_string(),
                })
            }
            "enable" => {
                let [_, target] = exact_tokens(s)?;
                Ok(Message::Enable { target: Target::parse_qualified(target)? })
            }
            "drop" => {
                let tokens: Vec<&str> = s.split(' ').collect();
                let target = match tokens.as_slice() {
                    [_, host] => Target::host(*host)?,
                    [_, host, test] => Target::test(*host, *test)?,
                    _ => return Err(unrecognized(s)),
                };
                Ok(Message::Drop { target })
            }
            "rename" => {
                let tokens: Vec<&str> = s.split(' ').collect();
                let rename = match tokens.as_slice() {
                    [_, from, to] => Rename::Host { from: from.to_string(), to: to.to_string() },
                    [_, host, from, to] => Rename::Test {
                        host: host.to_string(),
                        from: from.to_string(),
                        to: to.to_string(),
                    },
                    _ => return Err(unrecognized(s)),
                };
                Ok(Message::Rename(rename))
            }
            "modify" => {
                let (_, rest) = next_token(s);
                let (target, rest) = next_token(rest);
                let (color, rest) = next_token(rest);
                let (source, cause) = next_token(rest);
                Ok(Message::Modify {
                    target: Target::parse_qualified(target)?,
                    color: color.parse()?,
                    source: source.to_string(),
                    cause: cause.to_string(),
                })
            }
            "schedule" if s != "schedule" => {
                let (_, rest) = next_token(s);
                let (first, command) = next_token(rest);
                if first == "cancel" {
                    let job = command.parse().map_err(|_| unrecognized(s))?;
                    return Ok(Message::Unschedule { job });
                }
                let at = first.parse().map_err(|_| unrecognized(s))?;
                Ok(Message::Schedule { at, command: Box::new(command.parse()?) })
            }
            _ => Query::parse(s).map(Message::Query),
        }
    }
}

fn parse_status(s: &str) -> Result<Status, ValidationError> {
    let (verb, rest) = next_token(s);
    let modifiers = verb.strip_prefix("status").ok_or_else(|| unrecognized(s))?;
    let (lifetime, group) = match modifiers.split_once('/') {
        Some((lifetime, group)) => {
            let group = group.strip_prefix("group:").ok_or_else(|| unrecognized(s))?;
            (lifetime, Some(group.to_string()))
        }
        None => (modifiers, None),
    };
    let lifetime = match lifetime {
        "" => None,
        l => Some(l.strip_prefix('+').ok_or_else(|| unrecognized(s))?.parse::<Period>()?),
    };

    let (target, rest) = next_token(rest);
    let (color, rest) = next_token(rest);
    let (timestamp, text) = next_token(rest);

    Ok(Status {
        target: Target::parse_qualified(target)?,
        color: color.parse::<Color>()?,
        text: text.to_string(),
        lifetime,
        group,
        timestamp: (!timestamp.is_empty()).then(|| timestamp.to_string()),
    })
}

/// Split off the first space-delimited token.
pub(crate) fn next_token(s: &str) -> (&str, &str) {
    s.split_once(' ').unwrap_or((s, ""))
}

/// Split a header line into exactly `N` space-delimited tokens.
pub(crate) fn exact_tokens<const N: usize>(line: &str) -> Result<[&str; N], ValidationError> {
    let tokens: Vec<&str> = line.split(' ').collect();
    tokens.try_into().map_err(|_| unrecognized(line))
}

pub(crate) fn unrecognized(s: &str) -> ValidationError {
    let head = s.lines().next().unwrap_or_default();
    ValidationError::Unrecognized(head.to_string())
}
