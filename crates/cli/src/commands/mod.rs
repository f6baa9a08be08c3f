// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod combo;
pub mod query;
pub mod send;

use std::io::{IsTerminal, Read};

use xymon_client::{Connector, DeliveryError, Fanout, ServerAddr, Xymon};
use xymon_wire::{Message, Query, Reply};

use crate::exit_error::{codes, ExitError};
use crate::output::{self, OutputFormat, ReplyValue};

/// What a command asks of the servers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Send(Message),
    Query { query: Query, view: ReplyView },
}

/// How a query reply is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyView {
    Text,
    Rows,
    Version,
    Ghosts,
}

impl ReplyView {
    fn apply(self, fanout: Fanout<Reply>) -> Fanout<ReplyValue> {
        match self {
            ReplyView::Text => fanout.map(|reply| ReplyValue::Text(reply.into_text())),
            ReplyView::Rows => fanout.map(|reply| ReplyValue::Rows(reply.rows())),
            ReplyView::Version => fanout.map(|reply| ReplyValue::Text(reply.version().to_string())),
            ReplyView::Ghosts => fanout.and_then(|server, reply| {
                reply.ghosts().map(ReplyValue::Ghosts).map_err(|e| DeliveryError::from_reply(server, e))
            }),
        }
    }
}

impl Request {
    pub fn into_message(self) -> Message {
        match self {
            Request::Send(message) => message,
            Request::Query { query, .. } => Message::Query(query),
        }
    }

    pub async fn execute<C: Connector>(self, client: &Xymon<C>, format: OutputFormat) -> anyhow::Result<()> {
        match self {
            Request::Send(message) => {
                let results = client.send(message).await.map_err(ExitError::from)?.into_results();
                output::print_deliveries(&results, format)?;
                check(&results)?;
            }
            Request::Query { query, view } => {
                let fanout = client.request(query).await.map_err(ExitError::from)?;
                let results = view.apply(fanout).into_results();
                output::print_replies(&results, format)?;
                check(&results)?;
            }
        }
        Ok(())
    }
}

/// Turn per-server failures into an exit status.
///
/// Any failed server fails the command. Transport failures exit with the
/// delivery code even when another server only had a protocol error.
pub fn check<T>(results: &[(ServerAddr, Result<T, DeliveryError>)]) -> Result<(), ExitError> {
    let failures: Vec<&DeliveryError> = results.iter().filter_map(|(_, result)| result.as_ref().err()).collect();
    match failures.as_slice() {
        [] => Ok(()),
        [only] => Err(ExitError::from(*only)),
        many => {
            for err in many {
                eprintln!("error: {err}");
            }
            let code = if many.iter().any(|e| e.is_transient()) { codes::DELIVERY } else { codes::INVALID };
            Err(ExitError::new(code, format!("{} of {} deliveries failed", many.len(), results.len())))
        }
    }
}

/// Words joined by spaces, or stdin when there are none (or just `-`).
///
/// An interactive terminal is never read; the text is then empty.
pub(crate) fn text_or_stdin(words: Vec<String>) -> Result<String, ExitError> {
    if !(words.is_empty() || words == ["-"]) {
        return Ok(words.join(" "));
    }
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }
    let mut text = String::new();
    stdin
        .lock()
        .read_to_string(&mut text)
        .map_err(|e| ExitError::new(codes::INVALID, format!("cannot read stdin: {e}")))?;
    Ok(text.trim_end_matches(['\n', '\r']).to_string())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
