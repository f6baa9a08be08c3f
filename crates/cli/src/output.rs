// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;
use serde::Serialize;
use xymon_client::{Delivery, DeliveryError, ServerAddr};
use xymon_wire::{Color, Ghost};

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// A query reply after interpretation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReplyValue {
    Text(String),
    Rows(Vec<Vec<String>>),
    Ghosts(Vec<Ghost>),
}

impl ReplyValue {
    /// Plain text rendering, newline terminated unless empty.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        match self {
            ReplyValue::Text(text) => {
                out.push_str(text);
                if !text.is_empty() && !text.ends_with('\n') {
                    out.push('\n');
                }
            }
            ReplyValue::Rows(rows) => {
                for row in rows {
                    let cells: Vec<String> = row.iter().map(|cell| paint_cell(cell)).collect();
                    out.push_str(&cells.join("|"));
                    out.push('\n');
                }
            }
            ReplyValue::Ghosts(ghosts) => {
                for ghost in ghosts {
                    out.push_str(&ghost.to_string());
                    out.push('\n');
                }
            }
        }
        out
    }
}

/// Color names are shown in their own color.
fn paint_cell(cell: &str) -> String {
    match cell.parse::<Color>() {
        Ok(color) => crate::color::status(color),
        Err(_) => cell.to_string(),
    }
}

/// One line of JSON output per server
#[derive(Serialize)]
struct Outcome<'a, T: Serialize> {
    server: String,
    ok: bool,
    attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn outcomes<'a, T, V: Serialize>(
    results: &'a [(ServerAddr, Result<T, DeliveryError>)],
    attempts: impl Fn(&T) -> u32,
    reply: impl Fn(&'a T) -> Option<&'a V>,
) -> Vec<Outcome<'a, V>> {
    results
        .iter()
        .map(|(server, result)| match result {
            Ok(value) => Outcome {
                server: server.to_string(),
                ok: true,
                attempts: attempts(value),
                reply: reply(value),
                error: None,
            },
            Err(err) => Outcome {
                server: server.to_string(),
                ok: false,
                attempts: err.attempts(),
                reply: None,
                error: Some(err.to_string()),
            },
        })
        .collect()
}

/// Render delivery outcomes of a send.
///
/// Text output shows only replies (ack mode); failures are reported through
/// the exit status.
pub fn format_deliveries(
    results: &[(ServerAddr, Result<Delivery, DeliveryError>)],
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for (server, result) in results {
                if let Ok(delivery) = result {
                    tracing::info!(%server, attempts = delivery.attempts, "delivered");
                    if let Some(reply) = delivery.reply.as_ref().filter(|reply| !reply.is_empty()) {
                        out.push_str(&ReplyValue::Text(reply.text().to_string()).to_text());
                    }
                }
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let outcomes =
                outcomes(results, |delivery: &Delivery| delivery.attempts, |delivery| delivery.reply.as_ref());
            Ok(format!("{}\n", serde_json::to_string_pretty(&outcomes)?))
        }
    }
}

/// Render query replies.
///
/// With several servers, each reply is preceded by the server name.
pub fn format_replies(
    results: &[(ServerAddr, Result<ReplyValue, DeliveryError>)],
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for (server, result) in results {
                if let Ok(value) = result {
                    if results.len() > 1 {
                        out.push_str(&format!("== {} ==\n", crate::color::header(&server.to_string())));
                    }
                    out.push_str(&value.to_text());
                }
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let outcomes = outcomes(results, |_: &ReplyValue| 1, Some);
            Ok(format!("{}\n", serde_json::to_string_pretty(&outcomes)?))
        }
    }
}

pub fn print_deliveries(
    results: &[(ServerAddr, Result<Delivery, DeliveryError>)],
    format: OutputFormat,
) -> anyhow::Result<()> {
    print!("{}", format_deliveries(results, format)?);
    Ok(())
}

pub fn print_replies(
    results: &[(ServerAddr, Result<ReplyValue, DeliveryError>)],
    format: OutputFormat,
) -> anyhow::Result<()> {
    print!("{}", format_replies(results, format)?);
    Ok(())
}

/// Print wire text as it would be sent.
pub fn print_wire(text: &str) {
    if text.ends_with('\n') {
        print!("{text}");
    } else {
        println!("{text}");
    }
}
