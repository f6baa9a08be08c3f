// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reports and control messages

use clap::Subcommand;
use xymon_wire::{Color, DisableFor, Message, Period, Query, Rename, Status, Target};

use super::{text_or_stdin, ReplyView, Request};
use crate::exit_error::ExitError;

#[derive(Subcommand, Debug)]
pub enum SendCommand {
    /// Report the status of a test
    Status {
        /// host.test
        target: String,

        /// green, yellow, red, clear, blue or purple; inferred from &color
        /// markers in the text when omitted
        #[arg(short, long)]
        color: Option<String>,

        /// How long the status stays valid (30, 30m, 2h, 1d, 1w)
        #[arg(long, value_name = "DURATION")]
        lifetime: Option<String>,

        /// Route alerts for this status to a group
        #[arg(long)]
        group: Option<String>,

        /// Status text; read from stdin when omitted or `-`
        text: Vec<String>,
    },

    /// Send a notification for a test
    Notify {
        /// host.test
        target: String,
        /// Notification text; read from stdin when omitted or `-`
        text: Vec<String>,
    },

    /// Send data for graphing
    Data {
        /// host.dataname
        target: String,
        /// Data; read from stdin when omitted or `-`
        text: Vec<String>,
    },

    /// Send a client data section
    Client {
        host: String,
        /// Section name, e.g. the client OS type
        section: String,
        /// Payload; read from stdin when omitted or `-`
        payload: Vec<String>,
    },

    /// Disable a test (or all tests with host.*)
    Disable {
        /// host.test or host.*
        target: String,
        /// How long (30, 30m, 2h, 1d, 1w), or -1 to disable until the test is OK
        #[arg(allow_hyphen_values = true)]
        duration: String,
        /// Reason shown on the status page
        text: Vec<String>,
    },

    /// Re-enable a disabled test
    Enable {
        /// host.test or host.*
        target: String,
    },

    /// Remove a host, or one test of a host, from the server
    Drop { host: String, test: Option<String> },

    /// Rename a host (HOST NEW) or a test (HOST TEST NEW)
    Rename {
        host: String,
        name: String,
        new_name: Option<String>,
    },

    /// Change the color of a test on behalf of a named source
    Modify {
        /// host.test
        target: String,
        color: String,
        /// Who is making the change
        source: String,
        cause: Vec<String>,
    },

    /// List scheduled commands, schedule one, or cancel one
    Schedule {
        /// Run at this epoch second
        #[arg(long, conflicts_with_all = ["after", "cancel"])]
        at: Option<i64>,

        /// Run after this long (30m, 2h, ...)
        #[arg(long = "in", value_name = "DURATION", conflicts_with = "cancel")]
        after: Option<String>,

        /// Cancel the scheduled job with this id
        #[arg(long, value_name = "ID")]
        cancel: Option<u64>,

        /// The command to run, e.g. `disable web01.* 60 patching`
        command: Vec<String>,
    },
}

impl SendCommand {
    pub fn request(self) -> Result<Request, ExitError> {
        let message = match self {
            SendCommand::Status { target, color, lifetime, group, text } => {
                let text = text_or_stdin(text)?;
                let color = match color {
                    Some(color) => color.parse()?,
                    None => Color::from_markers(&text),
                };
                let mut status = Status::new(Target::parse_qualified(&target)?, color, text);
                if let Some(lifetime) = lifetime {
                    status = status.lifetime(lifetime.parse::<Period>()?);
                }
                if let Some(group) = group {
                    status = status.group(group);
                }
                Message::Status(status)
            }
            SendCommand::Notify { target, text } => {
                Message::Notify { target: Target::parse_qualified(&target)?, text: text_or_stdin(text)? }
            }
            SendCommand::Data { target, text } => {
                Message::Data { target: Target::parse_qualified(&target)?, text: text_or_stdin(text)? }
            }
            SendCommand::Client { host, section, payload } => {
                Message::Client { host, section, payload: text_or_stdin(payload)? }
            }
            SendCommand::Disable { target, duration, text } => Message::Disable {
                target: Target::parse_qualified(&target)?,
                duration: duration.parse::<DisableFor>()?,
                text: text.join(" "),
            },
            SendCommand::Enable { target } => Message::Enable { target: Target::parse_qualified(&target)? },
            SendCommand::Drop { host, test } => {
                let target = match test {
                    Some(test) => Target::test(host, test)?,
                    None => Target::host(host)?,
                };
                Message::Drop { target }
            }
            SendCommand::Rename { host, name, new_name } => match new_name {
                Some(to) => Message::Rename(Rename::Test { host, from: name, to }),
                None => Message::Rename(Rename::Host { from: host, to: name }),
            },
            SendCommand::Modify { target, color, source, cause } => Message::Modify {
                target: Target::parse_qualified(&target)?,
                color: color.parse()?,
                source,
                cause: cause.join(" "),
            },
            SendCommand::Schedule { at, after, cancel, command } => {
                return schedule(at, after, cancel, command);
            }
        };
        Ok(Request::Send(message))
    }
}

fn schedule(
    at: Option<i64>,
    after: Option<String>,
    cancel: Option<u64>,
    command: Vec<String>,
) -> Result<Request, ExitError> {
    if let Some(job) = cancel {
        return Ok(Request::Send(Message::Unschedule { job }));
    }
    let at = match (at, after) {
        (Some(at), _) => at,
        (None, Some(after)) => {
            let delay = after.parse::<Period>()?.as_duration();
            chrono::Utc::now().timestamp().saturating_add(i64::try_from(delay.as_secs()).unwrap_or(i64::MAX))
        }
        (None, None) if command.is_empty() => {
            return Ok(Request::Query { query: Query::Schedule, view: ReplyView::Text });
        }
        (None, None) => return Err(ExitError::usage("scheduling a command needs --at or --in")),
    };
    if command.is_empty() {
        return Err(ExitError::usage("nothing to schedule"));
    }
    let command: Message = command.join(" ").parse()?;
    Ok(Request::Send(Message::Schedule { at, command: Box::new(command) }))
}

#[cfg(test)]
#[path = "send_tests.rs"]
mod tests;
