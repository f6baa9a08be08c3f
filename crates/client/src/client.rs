// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! High-level client: one method per protocol verb, fanned out to every
//! configured server.

use futures_util::future::join_all;
use tokio_util::sync::CancellationToken;
use xymon_wire::{
    Color, DisableFor, Envelope, Ghost, Limits, Message, Query, Rename, Reply, SharedBatcher, Status, Target,
    ValidationError,
};

use crate::{
    ClientConfig, ConfigError, Connector, Deliverer, Delivery, DeliveryError, RetryPolicy, ServerAddr, TcpConnector,
    Timeouts, Transport,
};

/// Format of the timestamp stamped onto outgoing status messages
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Per-server outcome of one send, in configuration order.
#[derive(Debug)]
pub struct Fanout<T> {
    results: Vec<(ServerAddr, Result<T, DeliveryError>)>,
}

impl<T> Fanout<T> {
    pub fn iter(&self) -> impl Iterator<Item = (&ServerAddr, &Result<T, DeliveryError>)> {
        self.results.iter().map(|(server, result)| (server, result))
    }

    pub fn into_results(self) -> Vec<(ServerAddr, Result<T, DeliveryError>)> {
        self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn all_ok(&self) -> bool {
        self.results.iter().all(|(_, result)| result.is_ok())
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Fanout<U> {
        self.and_then(|_, value| Ok(f(value)))
    }

    /// Post-process each success; failures pass through untouched.
    pub fn and_then<U>(self, mut f: impl FnMut(&ServerAddr, T) -> Result<U, DeliveryError>) -> Fanout<U> {
        let results = self
            .results
            .into_iter()
            .map(|(server, result)| {
                let result = result.and_then(|value| f(&server, value));
                (server, result)
            })
            .collect();
        Fanout { results }
    }

    /// First success in server order, or the first failure when every server
    /// failed.
    pub fn first(self) -> Option<Result<T, DeliveryError>> {
        let mut first_err = None;
        for (_, result) in self.results {
            match result {
                Ok(value) => return Some(Ok(value)),
                Err(err) => {
                    first_err.get_or_insert(err);
                }
            }
        }
        first_err.map(Err)
    }
}

/// Builder for [`Xymon`].
#[derive(Debug, Clone, Default)]
pub struct XymonBuilder {
    servers: Vec<ServerAddr>,
    timeouts: Timeouts,
    policy: RetryPolicy,
    limits: Limits,
    parallel: bool,
    ack: bool,
    sender: Option<String>,
    cancel: Option<CancellationToken>,
}

impl XymonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            servers: config.server_addrs()?,
            timeouts: config.timeouts(),
            policy: config.retry_policy(),
            limits: config.limits()?,
            parallel: config.parallel,
            ack: config.ack,
            sender: config.sender_name(),
            cancel: None,
        })
    }

    pub fn server(mut self, server: ServerAddr) -> Self {
        self.servers.push(server);
        self
    }

    pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Deliver to all servers concurrently instead of one after another
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn ack(mut self, ack: bool) -> Self {
        self.ack = ack;
        self
    }

    /// Name the sender in a headline at the top of every status text
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Token that aborts every in-flight and future delivery once cancelled
    pub fn cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn build(self) -> Result<Xymon, ConfigError> {
        self.build_with(TcpConnector)
    }

    pub fn build_with<C: Connector>(self, connector: C) -> Result<Xymon<C>, ConfigError> {
        if self.servers.is_empty() {
            return Err(ConfigError::NoServers);
        }
        let transport = Transport::new(connector, self.timeouts);
        Ok(Xymon {
            servers: self.servers,
            deliverer: Deliverer::new(transport, self.policy).with_ack(self.ack),
            limits: self.limits,
            batcher: SharedBatcher::new(&self.limits),
            parallel: self.parallel,
            sender: self.sender,
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

/// Client for one or more Xymon servers.
///
/// Every send goes to every server. Methods return `Err` only when the message
/// itself is invalid; per-server delivery outcomes are in the [`Fanout`].
#[derive(Debug, Clone)]
pub struct Xymon<C = TcpConnector> {
    servers: Vec<ServerAddr>,
    deliverer: Deliverer<C>,
    limits: Limits,
    batcher: SharedBatcher,
    parallel: bool,
    sender: Option<String>,
    cancel: CancellationToken,
}

impl Xymon {
    pub fn builder() -> XymonBuilder {
        XymonBuilder::new()
    }
}

impl<C: Connector> Xymon<C> {
    pub fn servers(&self) -> &[ServerAddr] {
        &self.servers
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }

    fn stamp(&self, message: Message) -> Message {
        stamped(message, self.sender.as_deref())
    }

    /// Validate and encode without sending.
    pub fn encode(&self, message: impl Into<Message>) -> Result<String, ValidationError> {
        Ok(self.stamp(message.into()).encode(&self.limits)?.into_string())
    }

    /// Send any message right away.
    pub async fn send(&self, message: impl Into<Message>) -> Result<Fanout<Delivery>, ValidationError> {
        let wire = self.stamp(message.into()).encode(&self.limits)?;
        Ok(self.deliver(&Envelope::Single(wire)).await)
    }

    async fn deliver(&self, envelope: &Envelope) -> Fanout<Delivery> {
        let results = if self.parallel {
            join_all(self.servers.iter().map(|server| async move {
                (server.clone(), self.deliverer.deliver(server, envelope, &self.cancel).await)
            }))
            .await
        } else {
            let mut results = Vec::with_capacity(self.servers.len());
            for server in &self.servers {
                results.push((server.clone(), self.deliverer.deliver(server, envelope, &self.cancel).await));
            }
            results
        };
        Fanout { results }
    }

    // -- Reports and control --------------------------------------------------

    /// Stamped with the local time unless the status carries a timestamp.
    pub async fn status(&self, status: Status) -> Result<Fanout<Delivery>, ValidationError> {
        self.send(status).await
    }

    pub async fn notify(&self, target: Target, text: impl Into<String>) -> Result<Fanout<Delivery>, ValidationError> {
        self.send(Message::Notify { target, text: text.into() }).await
    }

    pub async fn data(&self, target: Target, text: impl Into<String>) -> Result<Fanout<Delivery>, ValidationError> {
        self.send(Message::Data { target, text: text.into() }).await
    }

    pub async fn client(
        &self,
        host: impl Into<String>,
        section: impl Into<String>,
        payload: impl Into<String>,
    ) -> Result<Fanout<Delivery>, ValidationError> {
        self.send(Message::Client { host: host.into(), section: section.into(), payload: payload.into() }).await
    }

    pub async fn disable(
        &self,
        target: Target,
        duration: DisableFor,
        text: impl Into<String>,
    ) -> Result<Fanout<Delivery>, ValidationError> {
        self.send(Message::Disable { target, duration, text: text.into() }).await
    }

    pub async fn enable(&self, target: Target) -> Result<Fanout<Delivery>, ValidationError> {
        self.send(Message::Enable { target }).await
    }

    pub async fn drop(&self, target: Target) -> Result<Fanout<Delivery>, ValidationError> {
        self.send(Message::Drop { target }).await
    }

    pub async fn rename(&self, rename: Rename) -> Result<Fanout<Delivery>, ValidationError> {
        self.send(Message::Rename(rename)).await
    }

    pub async fn modify(
        &self,
        target: Target,
        color: Color,
        source: impl Into<String>,
        cause: impl Into<String>,
    ) -> Result<Fanout<Delivery>, ValidationError> {
        self.send(Message::Modify { target, color, source: source.into(), cause: cause.into() }).await
    }

    /// Have the server run `command` at epoch second `at`.
    pub async fn schedule(&self, at: i64, command: Message) -> Result<Fanout<Delivery>, ValidationError> {
        self.send(Message::Schedule { at, command: Box::new(command) }).await
    }

    pub async fn unschedule(&self, job: u64) -> Result<Fanout<Delivery>, ValidationError> {
        self.send(Message::Unschedule { job }).await
    }

    // -- Queries --------------------------------------------------------------

    /// Send a query and keep the reply text.
    pub async fn request(&self, query: Query) -> Result<Fanout<Reply>, ValidationError> {
        let fanout = self.send(query).await?;
        Ok(fanout.and_then(|server, delivery| {
            delivery.reply.ok_or_else(|| DeliveryError::NoData { server: server.clone() })
        }))
    }

    /// Current status of one test
    pub async fn query(&self, target: Target) -> Result<Fanout<Reply>, ValidationError> {
        self.request(Query::Status(target)).await
    }

    /// Host configuration, one row of `|` separated columns per host
    pub async fn hostinfo(&self, criteria: Vec<String>) -> Result<Fanout<Vec<Vec<String>>>, ValidationError> {
        Ok(self.request(Query::HostInfo { criteria }).await?.map(|reply| reply.rows()))
    }

    pub async fn clientlog(
        &self,
        host: impl Into<String>,
        sections: Vec<String>,
    ) -> Result<Fanout<Reply>, ValidationError> {
        self.request(Query::ClientLog { host: host.into(), sections }).await
    }

    /// Server version
    pub async fn ping(&self) -> Result<Fanout<String>, ValidationError> {
        Ok(self.request(Query::Ping).await?.map(|reply| reply.version().to_string()))
    }

    pub async fn xymondlog(&self, target: Target) -> Result<Fanout<Reply>, ValidationError> {
        self.request(Query::XymondLog(target)).await
    }

    pub async fn xymondxlog(&self, target: Target) -> Result<Fanout<Reply>, ValidationError> {
        self.request(Query::XymondXLog(target)).await
    }

    /// Status board rows, projected onto `fields` when given
    pub async fn xymondboard(
        &self,
        criteria: Vec<String>,
        fields: Vec<String>,
    ) -> Result<Fanout<Vec<Vec<String>>>, ValidationError> {
        Ok(self.request(Query::Board { criteria, fields }).await?.map(|reply| reply.rows()))
    }

    pub async fn xymondxboard(
        &self,
        criteria: Vec<String>,
        fields: Vec<String>,
    ) -> Result<Fanout<Reply>, ValidationError> {
        self.request(Query::XBoard { criteria, fields }).await
    }

    pub async fn ghostlist(&self) -> Result<Fanout<Vec<Ghost>>, ValidationError> {
        Ok(self
            .request(Query::GhostList)
            .await?
            .and_then(|server, reply| reply.ghosts().map_err(|e| DeliveryError::from_reply(server, e))))
    }

    /// Pending scheduled commands
    pub async fn scheduled(&self) -> Result<Fanout<Reply>, ValidationError> {
        self.request(Query::Schedule).await
    }

    pub async fn download(&self, file: impl Into<String>) -> Result<Fanout<Reply>, ValidationError> {
        self.request(Query::Download(file.into())).await
    }

    pub async fn config(&self, file: impl Into<String>) -> Result<Fanout<Reply>, ValidationError> {
        self.request(Query::Config(file.into())).await
    }

    pub async fn notes(&self, file: impl Into<String>) -> Result<Fanout<Reply>, ValidationError> {
        self.request(Query::Notes(file.into())).await
    }

    pub async fn usermsg(&self, id: impl Into<String>) -> Result<Fanout<Reply>, ValidationError> {
        self.request(Query::UserMsg(id.into())).await
    }

    // -- Batching -------------------------------------------------------------

    /// Queue a message for the next [`Xymon::flush`].
    ///
    /// Messages that cannot be combined are delivered immediately and their
    /// outcome returned.
    pub async fn queue(&self, message: impl Into<Message>) -> Result<Option<Fanout<Delivery>>, ValidationError> {
        let wire = self.stamp(message.into()).encode(&self.limits)?;
        match self.batcher.add(wire) {
            Some(envelope) => Ok(Some(self.deliver(&envelope).await)),
            None => Ok(None),
        }
    }

    pub fn pending(&self) -> usize {
        self.batcher.len()
    }

    /// Deliver everything queued, as few transmissions as the combo limit
    /// allows, in queue order.
    pub async fn flush(&self) -> Vec<Fanout<Delivery>> {
        let envelopes = self.batcher.flush();
        tracing::debug!(envelopes = envelopes.len(), "flushing queue");
        let mut outcomes = Vec::with_capacity(envelopes.len());
        for envelope in &envelopes {
            outcomes.push(self.deliver(envelope).await);
        }
        outcomes
    }
}

/// Fill in missing status timestamps with the local time.
pub fn timestamped(message: Message) -> Message {
    stamped(message, None)
}

/// Like [`timestamped`]; with a `sender`, the status text also opens with
/// `Message generated by <sender> at <timestamp>`.
pub fn stamped(message: Message, sender: Option<&str>) -> Message {
    match message {
        Message::Status(mut status) => {
            let timestamp = status
                .timestamp
                .get_or_insert_with(|| chrono::Local::now().format(TIMESTAMP_FORMAT).to_string());
            if let Some(sender) = sender {
                let headline = format!("Message generated by {sender} at {timestamp}");
                status.text = if status.text.is_empty() { headline } else { format!("{headline}\n{}", status.text) };
            }
            Message::Status(status)
        }
        Message::Combo(members) => Message::Combo(members.into_iter().map(|m| stamped(m, sender)).collect()),
        other => other,
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
