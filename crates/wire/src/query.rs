// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Requests for server-held data.

use std::fmt::Write;

use crate::error::check_token;
use crate::parse::unrecognized;
use crate::{Target, ValidationError};

/// Query types for reading server state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Latest status of one test (`query host.test`)
    Status(Target),
    /// Host configuration rows matching the criteria
    HostInfo { criteria: Vec<String> },
    /// Raw client data, optionally limited to some sections
    ClientLog { host: String, sections: Vec<String> },
    /// Server version
    Ping,
    /// Full status log of one test
    XymondLog(Target),
    /// Full status log of one test, XML
    XymondXLog(Target),
    /// Status board rows, optionally projected onto `fields`
    Board { criteria: Vec<String>, fields: Vec<String> },
    /// Status board, XML
    XBoard { criteria: Vec<String>, fields: Vec<String> },
    /// Clients reporting without being configured
    GhostList,
    /// Pending scheduled commands
    Schedule,
    Download(String),
    Config(String),
    Notes(String),
    UserMsg(String),
}

impl Query {
    pub fn verb(&self) -> &'static str {
        match self {
            Query::Status(_) => "query",
            Query::HostInfo { .. } => "hostinfo",
            Query::ClientLog { .. } => "clientlog",
            Query::Ping => "ping",
            Query::XymondLog(_) => "xymondlog",
            Query::XymondXLog(_) => "xymondxlog",
            Query::Board { .. } => "xymondboard",
            Query::XBoard { .. } => "xymondxboard",
            Query::GhostList => "ghostlist",
            Query::Schedule => "schedule",
            Query::Download(_) => "download",
            Query::Config(_) => "config",
            Query::Notes(_) => "notes",
            Query::UserMsg(_) => "usermsg",
        }
    }

    pub(crate) fn render(&self, out: &mut String) -> Result<(), ValidationError> {
        out.push_str(self.verb());
        match self {
            Query::Status(target) | Query::XymondLog(target) | Query::XymondXLog(target) => {
                target.require_test()?;
                let _ = write!(out, " {}", target);
            }
            Query::HostInfo { criteria } => {
                for criterion in criteria {
                    check_token("criteria", criterion)?;
                    let _ = write!(out, " {}", criterion);
                }
            }
            Query::ClientLog { host, sections } => {
                check_token("host", host)?;
                let _ = write!(out, " {}", host);
                if !sections.is_empty() {
                    check_list("section", sections)?;
                    let _ = write!(out, " section={}", sections.join(","));
                }
            }
            Query::Board { criteria, fields } | Query::XBoard { criteria, fields } => {
                for criterion in criteria {
                    check_token("criteria", criterion)?;
                    let _ = write!(out, " {}", criterion);
                }
                if !fields.is_empty() {
                    check_list("field", fields)?;
                    let _ = write!(out, " fields={}", fields.join(","));
                }
            }
            Query::Download(name) | Query::Config(name) | Query::Notes(name) => {
                check_token("file name", name)?;
                let _ = write!(out, " {}", name);
            }
            Query::UserMsg(id) => {
                check_token("message id", id)?;
                let _ = write!(out, " {}", id);
            }
            Query::Ping | Query::GhostList | Query::Schedule => {}
        }
        Ok(())
    }

    pub(crate) fn parse(s: &str) -> Result<Self, ValidationError> {
        let mut tokens = s.split(' ');
        let verb = tokens.next().unwrap_or_default();
        let args: Vec<&str> = tokens.collect();

        let query = match verb {
            "query" | "xymondlog" | "xymondxlog" => {
                let [target] = single(s, &args)?;
                let target = Target::parse_qualified(target)?;
                match verb {
                    "query" => Query::Status(target),
                    "xymondlog" => Query::XymondLog(target),
                    _ => Query::XymondXLog(target),
                }
            }
            "hostinfo" => Query::HostInfo { criteria: owned(&args) },
            "clientlog" => {
                let (host, rest) = args.split_first().ok_or_else(|| unrecognized(s))?;
                let sections = match rest {
                    [] => Vec::new(),
                    [sections] => split_list(sections.strip_prefix("section=").ok_or_else(|| unrecognized(s))?),
                    _ => return Err(unrecognized(s)),
                };
                Query::ClientLog { host: host.to_string(), sections }
            }
            "xymondboard" | "xymondxboard" => {
                let mut criteria = Vec::new();
                let mut fields = Vec::new();
                for arg in &args {
                    match arg.strip_prefix("fields=") {
                        Some(list) => fields.extend(split_list(list)),
                        None => criteria.push(arg.to_string()),
                    }
                }
                if verb == "xymondboard" {
                    Query::Board { criteria, fields }
                } else {
                    Query::XBoard { criteria, fields }
                }
            }
            "ping" | "ghostlist" | "schedule" if args.is_empty() => match verb {
                "ping" => Query::Ping,
                "ghostlist" => Query::GhostList,
                _ => Query::Schedule,
            },
            "download" | "config" | "notes" | "usermsg" => {
                let [arg] = single(s, &args)?;
                let arg = arg.to_string();
                match verb {
                    "download" => Query::Download(arg),
                    "config" => Query::Config(arg),
                    "notes" => Query::Notes(arg),
                    _ => Query::UserMsg(arg),
                }
            }
            _ => return Err(unrecognized(s)),
        };
        Ok(query)
    }
}

fn check_list(field: &'static str, items: &[String]) -> Result<(), ValidationError> {
    for item in items {
        check_token(field, item)?;
        if item.contains(',') {
            return Err(ValidationError::InvalidField {
                field,
                value: item.clone(),
                reason: "must not contain a comma",
            });
        }
    }
    Ok(())
}

fn single<'a>(s: &str, args: &[&'a str]) -> Result<[&'a str; 1], ValidationError> {
    match args {
        [arg] => Ok([*arg]),
        _ => Err(unrecognized(s)),
    }
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',').filter(|s| !s.is_empty()).map(str::to_string).collect()
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
