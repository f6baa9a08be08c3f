// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delivery of one envelope to one server, with retries.
//!
//! State per attempt:
//!
//! ```text
//! Pending -> Connecting -> Sending -> [AwaitingResponse] -> Ok(Delivery)
//!                 \            \              \
//!                  +------------+--------------+--> Failed (retry or give up)
//! ```
//!
//! Cancellation wins over everything: a cancelled delivery stops at the next
//! suspension point and is reported as cancelled, never as a timeout.

use std::fmt;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use xymon_wire::{Envelope, Limits, Message, Reply, ReplyError, ValidationError};

use crate::{Connector, Phase, RetryPolicy, ServerAddr, TcpConnector, Transport, TransportError};

/// Where a delivery attempt is, or where it stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttemptState {
    Pending,
    Connecting,
    Sending,
    AwaitingResponse,
    /// Between attempts, waiting out the backoff
    Failed,
}

impl From<Phase> for AttemptState {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Connect => AttemptState::Connecting,
            Phase::Write => AttemptState::Sending,
            Phase::Read => AttemptState::AwaitingResponse,
        }
    }
}

impl fmt::Display for AttemptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AttemptState::Pending => "pending",
            AttemptState::Connecting => "connecting",
            AttemptState::Sending => "sending",
            AttemptState::AwaitingResponse => "awaiting response",
            AttemptState::Failed => "failed",
        })
    }
}

/// A completed delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub server: ServerAddr,
    /// Attempts made, including the successful one
    pub attempts: u32,
    /// Reply text, for queries (or any message in ack mode)
    pub reply: Option<Reply>,
}

/// Why a delivery did not complete
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Rejected before anything was sent
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Every attempt in the budget failed
    #[error("delivery to {server} failed after {attempts} attempt(s): {last}")]
    Failed {
        server: ServerAddr,
        attempts: u32,
        #[source]
        last: TransportError,
    },

    #[error("delivery to {server} cancelled while {state} (attempt {attempts})")]
    Cancelled { server: ServerAddr, attempts: u32, state: AttemptState },

    /// A query came back empty
    #[error("{server} returned no data")]
    NoData { server: ServerAddr },

    #[error("{server} sent a malformed reply: {source}")]
    Malformed {
        server: ServerAddr,
        #[source]
        source: ReplyError,
    },
}

impl DeliveryError {
    pub fn from_reply(server: &ServerAddr, err: ReplyError) -> Self {
        match err {
            ReplyError::NoData => DeliveryError::NoData { server: server.clone() },
            source => DeliveryError::Malformed { server: server.clone(), source },
        }
    }

    /// Network failures and cancellation, as opposed to bad input or replies
    pub fn is_transient(&self) -> bool {
        matches!(self, DeliveryError::Failed { .. } | DeliveryError::Cancelled { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            DeliveryError::Failed { attempts, .. } | DeliveryError::Cancelled { attempts, .. } => *attempts,
            DeliveryError::Invalid(_) => 0,
            DeliveryError::NoData { .. } | DeliveryError::Malformed { .. } => 1,
        }
    }
}

/// Sends envelopes to a server under a retry policy.
#[derive(Debug, Clone)]
pub struct Deliverer<C = TcpConnector> {
    transport: Transport<C>,
    policy: RetryPolicy,
    ack: bool,
}

impl<C: Connector> Deliverer<C> {
    pub fn new(transport: Transport<C>, policy: RetryPolicy) -> Self {
        Self { transport, policy, ack: false }
    }

    /// Wait for the server to close and keep whatever it sent, even for
    /// messages that normally get no reply.
    pub fn with_ack(mut self, ack: bool) -> Self {
        self.ack = ack;
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Validate, encode and deliver one message.
    pub async fn deliver_message(
        &self,
        server: &ServerAddr,
        message: &Message,
        limits: &Limits,
        cancel: &CancellationToken,
    ) -> Result<Delivery, DeliveryError> {
        let wire = message.encode(limits)?;
        self.deliver(server, &Envelope::Single(wire), cancel).await
    }

    /// Deliver an already encoded envelope.
    ///
    /// Transport failures are retried with backoff until the budget is spent.
    /// A query whose reply is empty fails with [`DeliveryError::NoData`]; that
    /// is an answer, not a transport failure, so it is not retried.
    pub async fn deliver(
        &self,
        server: &ServerAddr,
        envelope: &Envelope,
        cancel: &CancellationToken,
    ) -> Result<Delivery, DeliveryError> {
        let payload = envelope.payload();
        let is_query = envelope.expects_reply();
        let read_reply = is_query || self.ack;
        let max_attempts = self.policy.max_attempts;

        let mut attempt = 0;
        loop {
            attempt += 1;
            let mut state = AttemptState::Pending;
            tracing::debug!(%server, kind = %envelope.kind(), bytes = payload.len(), attempt, "delivering");

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = self.transport.send(server, payload.as_bytes(), read_reply, |phase| {
                    state = AttemptState::from(phase);
                }) => Some(result),
            };

            let result = match outcome {
                Some(result) => result,
                None => {
                    tracing::debug!(%server, attempt, %state, "delivery cancelled");
                    return Err(DeliveryError::Cancelled { server: server.clone(), attempts: attempt, state });
                }
            };

            let err = match result {
                Ok(bytes) => {
                    let reply = bytes.map(|bytes| Reply::from_bytes(&bytes));
                    let reply = match reply {
                        Some(reply) if is_query => {
                            Some(reply.require().map_err(|e| DeliveryError::from_reply(server, e))?)
                        }
                        other => other,
                    };
                    tracing::debug!(%server, attempt, "delivered");
                    return Ok(Delivery { server: server.clone(), attempts: attempt, reply });
                }
                Err(err) => err,
            };

            if attempt >= max_attempts {
                tracing::warn!(%server, attempts = attempt, error = %err, "delivery failed");
                return Err(DeliveryError::Failed { server: server.clone(), attempts: attempt, last: err });
            }

            let delay = self.policy.backoff.delay(attempt);
            tracing::warn!(%server, attempt, max_attempts, error = %err, ?delay, "attempt failed, retrying");
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(DeliveryError::Cancelled {
                        server: server.clone(),
                        attempts: attempt,
                        state: AttemptState::Failed,
                    });
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}

#[cfg(test)]
#[path = "delivery_tests.rs"]
mod tests;
