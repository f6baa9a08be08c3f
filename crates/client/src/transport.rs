// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One request per connection: connect, write, optionally read, close.
//!
//! Each phase is bounded by its own timeout. Nothing here retries; failures
//! carry the server and phase so the caller can decide.

use std::fmt;
use std::future::Future;
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::ServerAddr;

/// Step of a round trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Connect,
    Write,
    Read,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Connect => "connect",
            Phase::Write => "write",
            Phase::Read => "read",
        })
    }
}

/// Network failures. All of them are worth retrying.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("cannot resolve {server}: {reason}")]
    Resolve { server: ServerAddr, reason: String },

    #[error("connection refused by {server}")]
    Refused { server: ServerAddr },

    #[error("{phase} to {server} timed out after {after:?}")]
    Timeout { server: ServerAddr, phase: Phase, after: Duration },

    #[error("{phase} to {server} failed: {source}")]
    Io {
        server: ServerAddr,
        phase: Phase,
        #[source]
        source: io::Error,
    },
}

impl TransportError {
    pub fn io(server: &ServerAddr, phase: Phase, source: io::Error) -> Self {
        if phase == Phase::Connect && source.kind() == io::ErrorKind::ConnectionRefused {
            return TransportError::Refused { server: server.clone() };
        }
        TransportError::Io { server: server.clone(), phase, source }
    }

    pub fn phase(&self) -> Phase {
        match self {
            TransportError::Resolve { .. } | TransportError::Refused { .. } => Phase::Connect,
            TransportError::Timeout { phase, .. } | TransportError::Io { phase, .. } => *phase,
        }
    }

    pub fn server(&self) -> &ServerAddr {
        match self {
            TransportError::Resolve { server, .. }
            | TransportError::Refused { server }
            | TransportError::Timeout { server, .. }
            | TransportError::Io { server, .. } => server,
        }
    }
}

/// Opens byte streams to a server.
#[async_trait]
pub trait Connector: Clone + Send + Sync + 'static {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    async fn connect(&self, server: &ServerAddr) -> Result<Self::Stream, TransportError>;
}

/// Plain TCP, resolving the host name on every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self, server: &ServerAddr) -> Result<TcpStream, TransportError> {
        let addrs: Vec<_> = tokio::net::lookup_host((server.host(), server.port()))
            .await
            .map_err(|e| TransportError::Resolve { server: server.clone(), reason: e.to_string() })?
            .collect();
        if addrs.is_empty() {
            return Err(TransportError::Resolve {
                server: server.clone(),
                reason: "no addresses found".to_string(),
            });
        }

        let mut last_error = None;
        for addr in addrs {
            match TcpStream::connect(addr).await {
                Ok(stream) => {
                    let _ = stream.set_nodelay(true);
                    return Ok(stream);
                }
                Err(e) => {
                    tracing::debug!(%server, %addr, error = %e, "connect failed");
                    last_error = Some(e);
                }
            }
        }
        let source = last_error
            .unwrap_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "no address connected"));
        Err(TransportError::io(server, Phase::Connect, source))
    }
}

/// Per-phase time limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Resolution plus TCP handshake
    pub connect: Duration,
    pub write: Duration,
    /// Waiting for the server to finish its reply and close
    pub read: Duration,
}

impl Timeouts {
    /// The same limit for every phase
    pub fn uniform(limit: Duration) -> Self {
        Self { connect: limit, write: limit, read: limit }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(10),
            write: Duration::from_secs(10),
            read: Duration::from_secs(30),
        }
    }
}

/// Performs single round trips over a [`Connector`].
#[derive(Debug, Clone)]
pub struct Transport<C = TcpConnector> {
    connector: C,
    timeouts: Timeouts,
}

impl<C: Connector> Transport<C> {
    pub fn new(connector: C, timeouts: Timeouts) -> Self {
        Self { connector, timeouts }
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Send `payload` on a fresh connection.
    ///
    /// The write side is shut down once the payload is out. With
    /// `expect_reply`, everything the server sends until it closes is
    /// returned; otherwise the connection is dropped right away and the result
    /// is `None`. `on_phase` is told when each phase begins.
    pub async fn send<F>(
        &self,
        server: &ServerAddr,
        payload: &[u8],
        expect_reply: bool,
        mut on_phase: F,
    ) -> Result<Option<Vec<u8>>, TransportError>
    where
        F: FnMut(Phase) + Send,
    {
        on_phase(Phase::Connect);
        let mut stream = match tokio::time::timeout(self.timeouts.connect, self.connector.connect(server)).await {
            Ok(stream) => stream?,
            Err(_) => {
                return Err(TransportError::Timeout {
                    server: server.clone(),
                    phase: Phase::Connect,
                    after: self.timeouts.connect,
                })
            }
        };

        on_phase(Phase::Write);
        bounded(server, Phase::Write, self.timeouts.write, async {
            stream.write_all(payload).await?;
            stream.flush().await?;
            stream.shutdown().await
        })
        .await?;

        if !expect_reply {
            return Ok(None);
        }

        on_phase(Phase::Read);
        let mut reply = Vec::new();
        bounded(server, Phase::Read, self.timeouts.read, stream.read_to_end(&mut reply)).await?;
        Ok(Some(reply))
    }
}

async fn bounded<T>(
    server: &ServerAddr,
    phase: Phase,
    limit: Duration,
    io: impl Future<Output = io::Result<T>>,
) -> Result<T, TransportError> {
    match tokio::time::timeout(limit, io).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => Err(TransportError::io(server, phase, source)),
        Err(_) => Err(TransportError::Timeout { server: server.clone(), phase, after: limit }),
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use std::collections::VecDeque;
    use std::io;
    use std::pin::Pin;
    use std::sync::Arc;
    use std::task::{Context, Poll};

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

    use super::{Connector, Phase, TransportError};
    use crate::ServerAddr;

    /// What the next connection attempt does
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum FakeOutcome {
        /// Accept, take the request, answer with these bytes and close
        Reply(Vec<u8>),
        Refuse,
        Unresolvable,
        /// Never finish connecting
        HangConnect,
        /// Accept, then reset the connection on write
        ResetOnWrite,
        /// Accept and take the request, but never answer or close
        HangRead,
    }

    /// Recorded connection attempt
    #[derive(Debug, Clone)]
    pub struct FakeCall {
        pub server: ServerAddr,
        written: Arc<Mutex<Vec<u8>>>,
    }

    impl FakeCall {
        /// Bytes the client wrote on this connection
        pub fn request(&self) -> Vec<u8> {
            self.written.lock().clone()
        }

        pub fn request_text(&self) -> String {
            String::from_utf8_lossy(&self.request()).into_owned()
        }
    }

    #[derive(Debug)]
    struct FakeState {
        script: VecDeque<FakeOutcome>,
        calls: Vec<FakeCall>,
    }

    /// Scripted connector for testing.
    ///
    /// Outcomes are consumed in order; once the script runs out every
    /// connection is accepted and answered with an empty reply.
    #[derive(Clone, Debug)]
    pub struct FakeConnector {
        inner: Arc<Mutex<FakeState>>,
    }

    impl Default for FakeConnector {
        fn default() -> Self {
            Self { inner: Arc::new(Mutex::new(FakeState { script: VecDeque::new(), calls: Vec::new() })) }
        }
    }

    impl FakeConnector {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn scripted(outcomes: impl IntoIterator<Item = FakeOutcome>) -> Self {
            let fake = Self::default();
            fake.inner.lock().script.extend(outcomes);
            fake
        }

        pub fn push(&self, outcome: FakeOutcome) {
            self.inner.lock().script.push_back(outcome);
        }

        /// All connection attempts so far, refused ones included
        pub fn calls(&self) -> Vec<FakeCall> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl Connector for FakeConnector {
        type Stream = FakeStream;

        async fn connect(&self, server: &ServerAddr) -> Result<FakeStream, TransportError> {
            let written = Arc::new(Mutex::new(Vec::new()));
            let outcome = {
                let mut state = self.inner.lock();
                state.calls.push(FakeCall { server: server.clone(), written: Arc::clone(&written) });
                state.script.pop_front().unwrap_or(FakeOutcome::Reply(Vec::new()))
            };

            let stream = |reply: Vec<u8>, reset: bool, hang: bool| FakeStream {
                written: Arc::clone(&written),
                reply,
                pos: 0,
                reset_on_write: reset,
                hang_read: hang,
            };
            match outcome {
                FakeOutcome::Reply(reply) => Ok(stream(reply, false, false)),
                FakeOutcome::ResetOnWrite => Ok(stream(Vec::new(), true, false)),
                FakeOutcome::HangRead => Ok(stream(Vec::new(), false, true)),
                FakeOutcome::Refuse => Err(TransportError::io(
                    server,
                    Phase::Connect,
                    io::Error::from(io::ErrorKind::ConnectionRefused),
                )),
                FakeOutcome::Unresolvable => Err(TransportError::Resolve {
                    server: server.clone(),
                    reason: "name or service not known".to_string(),
                }),
                FakeOutcome::HangConnect => std::future::pending().await,
            }
        }
    }

    /// In-memory connection served by [`FakeConnector`]
    #[derive(Debug)]
    pub struct FakeStream {
        written: Arc<Mutex<Vec<u8>>>,
        reply: Vec<u8>,
        pos: usize,
        reset_on_write: bool,
        hang_read: bool,
    }

    impl AsyncWrite for FakeStream {
        fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
            if self.reset_on_write {
                return Poll::Ready(Err(io::Error::from(io::ErrorKind::ConnectionReset)));
            }
            self.written.lock().extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    impl AsyncRead for FakeStream {
        fn poll_read(self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
            let this = self.get_mut();
            if this.hang_read {
                return Poll::Pending;
            }
            let n = buf.remaining().min(this.reply.len() - this.pos);
            buf.put_slice(&this.reply[this.pos..this.pos + n]);
            this.pos += n;
            Poll::Ready(Ok(()))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeCall, FakeConnector, FakeOutcome, FakeStream};

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
