// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed protocol messages and their wire text.

use std::fmt::{self, Write};

use crate::error::{check_line, check_token};
use crate::{combo, wire, Color, DisableFor, Period, Query, Target, ValidationError};

/// Historical single-message limit of the server
pub const DEFAULT_MAX_MESSAGE: usize = 4096;

/// Default upper bound for one combo transmission
pub const DEFAULT_MAX_COMBO: usize = 65_536;

/// Size limits applied when encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_message: usize,
    pub max_combo: usize,
}

impl Limits {
    pub fn new(max_message: usize, max_combo: usize) -> Result<Self, ValidationError> {
        if max_combo < max_message {
            return Err(ValidationError::InvalidLimits { message: max_message, combo: max_combo });
        }
        Ok(Self { max_message, max_combo })
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_message: DEFAULT_MAX_MESSAGE, max_combo: DEFAULT_MAX_COMBO }
    }
}

/// Protocol verb of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Status,
    Combo,
    Notify,
    Data,
    Client,
    Disable,
    Enable,
    Drop,
    Rename,
    Modify,
    Schedule,
    Query,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Status => "status",
            MessageKind::Combo => "combo",
            MessageKind::Notify => "notify",
            MessageKind::Data => "data",
            MessageKind::Client => "client",
            MessageKind::Disable => "disable",
            MessageKind::Enable => "enable",
            MessageKind::Drop => "drop",
            MessageKind::Rename => "rename",
            MessageKind::Modify => "modify",
            MessageKind::Schedule => "schedule",
            MessageKind::Query => "query",
        }
    }

    /// Whether the server accepts this kind inside a combo.
    pub fn is_combinable(self) -> bool {
        matches!(self, MessageKind::Status | MessageKind::Data)
    }

    /// Whether the server answers this kind with data.
    pub fn expects_reply(self) -> bool {
        matches!(self, MessageKind::Query)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status report for one test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub target: Target,
    pub color: Color,
    pub text: String,
    /// How long the status stays valid once received
    pub lifetime: Option<Period>,
    /// Direct alerts to a specific group
    pub group: Option<String>,
    /// Single token written after the color; blank when `None`
    pub timestamp: Option<String>,
}

impl Status {
    pub fn new(target: Target, color: Color, text: impl Into<String>) -> Self {
        Self { target, color, text: text.into(), lifetime: None, group: None, timestamp: None }
    }

    pub fn lifetime(mut self, lifetime: Period) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}

/// Rename a host, or a test within a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rename {
    Host { from: String, to: String },
    Test { host: String, from: String, to: String },
}

/// Every message the client knows how to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Status(Status),
    /// Several combinable messages in one transmission, in order
    Combo(Vec<Message>),
    Notify {
        target: Target,
        text: String,
    },
    Data {
        /// `host.dataname`
        target: Target,
        text: String,
    },
    Client {
        host: String,
        section: String,
        payload: String,
    },
    Disable {
        target: Target,
        duration: DisableFor,
        text: String,
    },
    Enable {
        target: Target,
    },
    /// Forget a host, or one test of it
    Drop {
        target: Target,
    },
    Rename(Rename),
    Modify {
        target: Target,
        color: Color,
        source: String,
        cause: String,
    },
    /// Run `command` on the server at epoch second `at`
    Schedule {
        at: i64,
        command: Box<Message>,
    },
    /// Cancel a scheduled job
    Unschedule {
        job: u64,
    },
    Query(Query),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Status(_) => MessageKind::Status,
            Message::Combo(_) => MessageKind::Combo,
            Message::Notify { .. } => MessageKind::Notify,
            Message::Data { .. } => MessageKind::Data,
            Message::Client { .. } => MessageKind::Client,
            Message::Disable { .. } => MessageKind::Disable,
            Message::Enable { .. } => MessageKind::Enable,
            Message::Drop { .. } => MessageKind::Drop,
            Message::Rename(_) => MessageKind::Rename,
            Message::Modify { .. } => MessageKind::Modify,
            Message::Schedule { .. } | Message::Unschedule { .. } => MessageKind::Schedule,
            Message::Query(_) => MessageKind::Query,
        }
    }

    /// Validate and serialize into wire text.
    ///
    /// Oversize messages are rejected, never truncated.
    pub fn encode(&self, limits: &Limits) -> Result<WireMessage, ValidationError> {
        if let Message::Combo(members) = self {
            if members.is_empty() {
                return Err(ValidationError::EmptyCombo);
            }
            let encoded = members
                .iter()
                .map(|member| {
                    if !member.kind().is_combinable() {
                        return Err(ValidationError::NotCombinable(member.kind()));
                    }
                    member.encode(limits)
                })
                .collect::<Result<Vec<_>, _>>()?;
            let text = combo::combo_text(&encoded);
            check_size(text.len(), limits.max_combo)?;
            return Ok(WireMessage { kind: MessageKind::Combo, text });
        }

        let rendered = self.render()?;
        if self.kind().is_combinable() {
            check_member_text(self.kind().as_str(), &rendered)?;
        }
        let text = wire::encode(&rendered);
        check_size(text.len(), limits.max_message)?;
        Ok(WireMessage { kind: self.kind(), text })
    }

    fn render(&self) -> Result<String, ValidationError> {
        let mut out = String::new();
        match self {
            Message::Status(status) => {
                status.target.require_test()?;
                out.push_str("status");
                if let Some(lifetime) = status.lifetime {
                    let _ = write!(out, "+{}", lifetime);
                }
                if let Some(group) = &status.group {
                    check_token("group", group)?;
                    let _ = write!(out, "/group:{}", group);
                }
                let _ = write!(out, " {} {} ", status.target, status.color);
                if let Some(timestamp) = &status.timestamp {
                    check_token("timestamp", timestamp)?;
                    out.push_str(timestamp);
                }
                push_text(&mut out, &status.text);
            }
            Message::Combo(_) => return Err(ValidationError::NotCombinable(MessageKind::Combo)),
            Message::Notify { target, text } => {
                target.require_test()?;
                let _ = write!(out, "notify {}", target);
                push_text(&mut out, text);
            }
            Message::Data { target, text } => {
                target.require_test()?;
                let _ = write!(out, "data {}\n{}", target, text);
            }
            Message::Client { host, section, payload } => {
                check_token("host", host)?;
                check_token("section", section)?;
                let _ = write!(out, "client {} {}\n{}", host, section, payload);
            }
            Message::Disable { target, duration, text } => {
                target.require_test()?;
                let _ = write!(out, "disable {} {}", target, duration);
                push_text(&mut out, text);
            }
            Message::Enable { target } => {
                target.require_test()?;
                let _ = write!(out, "enable {}", target);
            }
            Message::Drop { target } => {
                out.push_str("drop ");
                out.push_str(target.host_name());
                if let Some(test) = target.test_name() {
                    out.push(' ');
                    out.push_str(test);
                }
            }
            Message::Rename(Rename::Host { from, to }) => {
                check_token("host", from)?;
                check_token("new host", to)?;
                let _ = write!(out, "rename {} {}", from, to);
            }
            Message::Rename(Rename::Test { host, from, to }) => {
                check_token("host", host)?;
                check_token("test", from)?;
                check_token("new test", to)?;
                let _ = write!(out, "rename {} {} {}", host, from, to);
            }
            Message::Modify { target, color, source, cause } => {
                target.require_test()?;
                check_token("source", source)?;
                check_line("cause", cause)?;
                let _ = write!(out, "modify {} {} {}", target, color, source);
                push_text(&mut out, cause);
            }
            Message::Schedule { at, command } => {
                if matches!(
                    command.kind(),
                    MessageKind::Combo | MessageKind::Schedule | MessageKind::Query
                ) {
                    return Err(ValidationError::InvalidField {
                        field: "scheduled command",
                        value: command.kind().to_string(),
                        reason: "only status and control messages can be scheduled",
                    });
                }
                let command = command.render()?;
                check_line("scheduled command", &command)?;
                let _ = write!(out, "schedule {} {}", at, command);
            }
            Message::Unschedule { job } => {
                let _ = write!(out, "schedule cancel {}", job);
            }
            Message::Query(query) => query.render(&mut out)?,
        }
        Ok(out)
    }
}

impl From<Status> for Message {
    fn from(status: Status) -> Self {
        Message::Status(status)
    }
}

impl From<Query> for Message {
    fn from(query: Query) -> Self {
        Message::Query(query)
    }
}

/// A validated, encoded message ready for batching or transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireMessage {
    kind: MessageKind,
    text: String,
}

impl WireMessage {
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn expects_reply(&self) -> bool {
        self.kind.expects_reply()
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Parse the wire text back into a typed message.
    pub fn decode(&self) -> Result<Message, ValidationError> {
        self.text.parse()
    }
}

impl fmt::Display for WireMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn push_text(out: &mut String, text: &str) {
    if !text.is_empty() {
        out.push(' ');
        out.push_str(text);
    }
}

/// A combinable message must not contain what a combo reader takes for the
/// start of the next member.
fn check_member_text(field: &'static str, text: &str) -> Result<(), ValidationError> {
    if combo::splits_members(text) {
        return Err(ValidationError::InvalidField {
            field,
            value: text.to_string(),
            reason: "a blank line followed by a status or data line would split a combo",
        });
    }
    Ok(())
}

fn check_size(size: usize, limit: usize) -> Result<(), ValidationError> {
    if size > limit {
        return Err(ValidationError::TooLarge { size, limit });
    }
    Ok(())
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
