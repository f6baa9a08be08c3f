// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batched status reports read from a file or stdin

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use xymon_client::{stamped, Connector, Fanout, Xymon};
use xymon_wire::{ComboBatcher, Envelope, Limits, Message, Status, Target, ValidationError};

use crate::exit_error::{codes, ExitError};
use crate::output::{self, OutputFormat};

#[derive(Args, Debug)]
pub struct ComboArgs {
    /// Read status lines from this file instead of stdin
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

impl ComboArgs {
    /// One status per line: `host.test color [text]`. Blank lines and lines
    /// starting with `#` are skipped.
    pub fn read(&self) -> Result<Vec<Status>, ExitError> {
        let input = match &self.file {
            Some(path) => std::fs::read_to_string(path)
                .map_err(|e| ExitError::usage(format!("cannot read {}: {e}", path.display())))?,
            None => {
                let mut input = String::new();
                std::io::stdin()
                    .read_to_string(&mut input)
                    .map_err(|e| ExitError::new(codes::INVALID, format!("cannot read stdin: {e}")))?;
                input
            }
        };
        parse_lines(&input)
    }
}

pub(crate) fn parse_lines(input: &str) -> Result<Vec<Status>, ExitError> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|(idx, line)| {
            parse_line(line).map_err(|e| ExitError::new(codes::INVALID, format!("line {}: {e}", idx + 1)))
        })
        .collect()
}

fn parse_line(line: &str) -> Result<Status, ValidationError> {
    let (target, rest) = line.split_once(' ').unwrap_or((line, ""));
    let (color, text) = rest.split_once(' ').unwrap_or((rest, ""));
    Ok(Status::new(Target::parse_qualified(target)?, color.parse()?, text))
}

/// Wire payloads the statuses would be sent as.
pub fn encode(statuses: Vec<Status>, limits: &Limits, sender: Option<&str>) -> Result<Vec<String>, ExitError> {
    let mut batcher = ComboBatcher::new(limits);
    let mut envelopes = Vec::new();
    for status in statuses {
        let wire = stamped(Message::Status(status), sender).encode(limits)?;
        envelopes.extend(batcher.add(wire));
    }
    envelopes.extend(batcher.flush());
    Ok(envelopes.iter().map(Envelope::payload).collect())
}

pub async fn handle<C: Connector>(
    statuses: Vec<Status>,
    client: &Xymon<C>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let count = statuses.len();
    for status in statuses {
        if let Some(fanout) = client.queue(status).await.map_err(ExitError::from)? {
            let results = fanout.into_results();
            output::print_deliveries(&results, format)?;
            super::check(&results)?;
        }
    }
    let outcomes = client.flush().await;
    tracing::info!(statuses = count, envelopes = outcomes.len(), "combo flushed");

    let results: Vec<_> = outcomes.into_iter().flat_map(Fanout::into_results).collect();
    output::print_deliveries(&results, format)?;
    super::check(&results)?;
    Ok(())
}

#[cfg(test)]
#[path = "combo_tests.rs"]
mod tests;
