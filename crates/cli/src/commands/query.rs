// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queries for server-held data

use clap::Subcommand;
use xymon_wire::{Query, Target};

use super::{ReplyView, Request};
use crate::exit_error::ExitError;

#[derive(Subcommand, Debug)]
pub enum QueryCommand {
    /// Current color and text of one test
    Query {
        /// host.test
        target: String,
    },

    /// Host configuration rows matching criteria (e.g. host=web.* page=dmz)
    Hostinfo { criteria: Vec<String> },

    /// Raw client data last sent by a host
    Clientlog {
        host: String,
        /// Only these sections (repeatable or comma separated)
        #[arg(long = "section", value_delimiter = ',')]
        sections: Vec<String>,
    },

    /// Server version
    Ping,

    /// Full status log of one test
    Xymondlog {
        /// host.test
        target: String,
    },

    /// Full status log of one test, as XML
    Xymondxlog {
        /// host.test
        target: String,
    },

    /// Status board rows matching criteria (e.g. color=red,yellow)
    Board {
        criteria: Vec<String>,
        /// Columns to return (repeatable or comma separated)
        #[arg(long = "fields", value_delimiter = ',')]
        fields: Vec<String>,
    },

    /// Status board as XML
    Xboard {
        criteria: Vec<String>,
        #[arg(long = "fields", value_delimiter = ',')]
        fields: Vec<String>,
    },

    /// Hosts reporting without being configured
    Ghostlist,

    /// Fetch a file from the server's download area
    Download { file: String },

    /// Fetch a server configuration file
    Config { file: String },

    /// Fetch a notes file
    Notes { file: String },

    /// Fetch a user message by id
    Usermsg { id: String },
}

impl QueryCommand {
    pub fn request(self) -> Result<Request, ExitError> {
        let (query, view) = match self {
            QueryCommand::Query { target } => (Query::Status(Target::parse_qualified(&target)?), ReplyView::Text),
            QueryCommand::Hostinfo { criteria } => (Query::HostInfo { criteria }, ReplyView::Rows),
            QueryCommand::Clientlog { host, sections } => (Query::ClientLog { host, sections }, ReplyView::Text),
            QueryCommand::Ping => (Query::Ping, ReplyView::Version),
            QueryCommand::Xymondlog { target } => {
                (Query::XymondLog(Target::parse_qualified(&target)?), ReplyView::Text)
            }
            QueryCommand::Xymondxlog { target } => {
                (Query::XymondXLog(Target::parse_qualified(&target)?), ReplyView::Text)
            }
            QueryCommand::Board { criteria, fields } => (Query::Board { criteria, fields }, ReplyView::Rows),
            QueryCommand::Xboard { criteria, fields } => (Query::XBoard { criteria, fields }, ReplyView::Text),
            QueryCommand::Ghostlist => (Query::GhostList, ReplyView::Ghosts),
            QueryCommand::Download { file } => (Query::Download(file), ReplyView::Text),
            QueryCommand::Config { file } => (Query::Config(file), ReplyView::Text),
            QueryCommand::Notes { file } => (Query::Notes(file), ReplyView::Text),
            QueryCommand::Usermsg { id } => (Query::UserMsg(id), ReplyView::Text),
        };
        Ok(Request::Query { query, view })
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
