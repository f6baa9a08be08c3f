// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Xymon client: delivers protocol messages to one or more servers.
//!
//! Every message travels over its own TCP connection. Transient network
//! failures are retried with backoff; validation failures never are.
//!
//! Success for a status-like message means the bytes were written and the
//! connection closed cleanly. The protocol has no acknowledgement, so it does
//! not mean the server accepted the report.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod backoff;
mod client;
mod config;
mod delivery;
pub mod env;
mod server;
mod transport;

pub use backoff::{Backoff, RetryPolicy};
pub use client::{stamped, timestamped, Fanout, Xymon, XymonBuilder};
pub use config::{BackoffKind, ClientConfig, ConfigError};
pub use delivery::{AttemptState, Deliverer, Delivery, DeliveryError};
pub use server::ServerAddr;
pub use transport::{Connector, Phase, TcpConnector, Timeouts, Transport, TransportError};

#[cfg(any(test, feature = "test-support"))]
pub use transport::{FakeCall, FakeConnector, FakeOutcome};

pub use tokio_util::sync::CancellationToken;
pub use xymon_wire as wire;
