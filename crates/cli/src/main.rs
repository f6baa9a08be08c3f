// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! xymon-client: send reports to and query Xymon servers

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod color;
mod commands;
mod exit_error;
mod output;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use xymon_client::{stamped, CancellationToken, ClientConfig, Xymon, XymonBuilder};

use crate::commands::{combo, query, send};
use crate::exit_error::{codes, ExitError};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "xymon-client", version, about = "Send status reports to and query Xymon servers")]
#[command(styles = color::styles())]
struct Cli {
    /// Server as host[:port]; repeat to report to several servers
    #[arg(short = 's', long = "server", value_name = "HOST[:PORT]", global = true)]
    servers: Vec<String>,

    /// Port for servers given without one [default: 1984]
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Connect, write and read timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    timeout: Option<u64>,

    /// Delivery attempts per server, including the first
    #[arg(long, value_name = "N", global = true)]
    retries: Option<u32>,

    /// Deliver to all servers at once
    #[arg(long, global = true)]
    parallel: bool,

    /// Print the wire text instead of sending it
    #[arg(short = 'n', long, global = true)]
    dry_run: bool,

    /// More logging on stderr (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Sender named in the headline of status messages [default: host name];
    /// empty for no headline
    #[arg(long, value_name = "NAME", global = true)]
    sender: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t, global = true)]
    output: OutputFormat,

    /// Config file [default: $XYMON_CLIENT_CONFIG, then the per-user config]
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Send(send::SendCommand),

    /// Send status lines (`host.test color text`) batched into combo messages
    Combo(combo::ComboArgs),

    #[command(flatten)]
    Query(query::QueryCommand),
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // Help and version go to stdout and are not errors
            std::process::exit(if err.use_stderr() { codes::USAGE } else { 0 });
        }
    };

    init_tracing(cli.verbose, cli.quiet);

    if let Err(err) = run(cli).await {
        match err.downcast_ref::<ExitError>() {
            Some(exit) => {
                if !exit.message.is_empty() {
                    eprintln!("error: {}", exit.message);
                }
                std::process::exit(exit.code);
            }
            None => {
                eprintln!("error: {err:#}");
                std::process::exit(codes::INVALID);
            }
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let limits = config.limits().map_err(ExitError::from)?;

    match cli.command {
        Commands::Combo(args) => {
            let statuses = args.read()?;
            if cli.dry_run {
                for payload in combo::encode(statuses, &limits, config.sender_name().as_deref())? {
                    output::print_wire(&payload);
                }
                return Ok(());
            }
            let client = connect(&config)?;
            combo::handle(statuses, &client, cli.output).await
        }
        Commands::Send(command) => {
            let request = command.request()?;
            dispatch(request, &config, cli.dry_run, cli.output).await
        }
        Commands::Query(command) => {
            let request = command.request()?;
            dispatch(request, &config, cli.dry_run, cli.output).await
        }
    }
}

async fn dispatch(
    request: commands::Request,
    config: &ClientConfig,
    dry_run: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    if dry_run {
        let limits = config.limits().map_err(ExitError::from)?;
        let sender = config.sender_name();
        let wire = stamped(request.into_message(), sender.as_deref()).encode(&limits).map_err(ExitError::from)?;
        output::print_wire(wire.as_str());
        return Ok(());
    }
    let client = connect(config)?;
    request.execute(&client, format).await
}

/// Config file, then environment, then command-line flags.
fn load_config(cli: &Cli) -> Result<ClientConfig, ExitError> {
    let config = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::discover()?,
    };
    let mut config = config.apply_env();

    if !cli.servers.is_empty() {
        config.servers = cli.servers.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(secs) = cli.timeout {
        let ms = secs.saturating_mul(1000);
        config.connect_timeout_ms = ms;
        config.write_timeout_ms = ms;
        config.read_timeout_ms = ms;
    }
    if let Some(attempts) = cli.retries {
        config.max_attempts = attempts;
    }
    if cli.parallel {
        config.parallel = true;
    }
    if let Some(sender) = &cli.sender {
        config.sender = Some(sender.clone());
    }
    Ok(config)
}

/// Build a client whose deliveries stop on Ctrl-C.
fn connect(config: &ClientConfig) -> Result<Xymon, ExitError> {
    let cancel = CancellationToken::new();
    let client = XymonBuilder::from_config(config)?.cancel_token(cancel.clone()).build()?;

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling deliveries");
            cancel.cancel();
        }
    });
    Ok(client)
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
