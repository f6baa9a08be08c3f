// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batching messages into combo transmissions.
//!
//! Wire format: `combo\n` + members separated by a blank line + `\n`.
//! Insertion order is preserved; nothing is dropped to make things fit.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Limits, MessageKind, WireMessage};

pub const COMBO_HEADER: &str = "combo\n";

const SEPARATOR: &str = "\n\n";

/// One payload for the transport: a single message or a combo of several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    Single(WireMessage),
    Combo(Vec<WireMessage>),
}

impl Envelope {
    pub fn kind(&self) -> MessageKind {
        match self {
            Envelope::Single(message) => message.kind(),
            Envelope::Combo(_) => MessageKind::Combo,
        }
    }

    /// Wire text handed to the transport
    pub fn payload(&self) -> String {
        match self {
            Envelope::Single(message) => message.as_str().to_string(),
            Envelope::Combo(messages) => combo_text(messages),
        }
    }

    /// Byte length of [`Envelope::payload`]
    pub fn len(&self) -> usize {
        match self {
            Envelope::Single(message) => message.len(),
            Envelope::Combo(messages) => {
                combo_len(messages.iter().map(WireMessage::len).sum(), messages.len())
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Member messages in transmission order
    pub fn messages(&self) -> &[WireMessage] {
        match self {
            Envelope::Single(message) => std::slice::from_ref(message),
            Envelope::Combo(messages) => messages,
        }
    }

    pub fn expects_reply(&self) -> bool {
        match self {
            Envelope::Single(message) => message.expects_reply(),
            Envelope::Combo(_) => false,
        }
    }
}

impl From<WireMessage> for Envelope {
    fn from(message: WireMessage) -> Self {
        Envelope::Single(message)
    }
}

/// Accumulates combinable messages until flushed.
#[derive(Debug)]
pub struct ComboBatcher {
    max_combo: usize,
    pending: Vec<WireMessage>,
}

impl ComboBatcher {
    pub fn new(limits: &Limits) -> Self {
        Self { max_combo: limits.max_combo, pending: Vec::new() }
    }

    /// Queue a message, or hand it straight back when it cannot be combined.
    pub fn add(&mut self, message: WireMessage) -> Option<Envelope> {
        if !message.kind().is_combinable() {
            return Some(Envelope::Single(message));
        }
        self.pending.push(message);
        None
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drain the queue into envelopes no larger than the combo limit.
    ///
    /// Groups are filled greedily in insertion order. A group holding a single
    /// message goes out as that message alone, and so does a message too large
    /// to fit in any combo.
    pub fn flush(&mut self) -> Vec<Envelope> {
        let mut envelopes = Vec::new();
        let mut group: Vec<WireMessage> = Vec::new();
        let mut group_bytes = 0;

        for message in self.pending.drain(..) {
            if combo_len(message.len(), 1) > self.max_combo {
                close_group(&mut envelopes, &mut group);
                group_bytes = 0;
                envelopes.push(Envelope::Single(message));
                continue;
            }
            if !group.is_empty()
                && combo_len(group_bytes + message.len(), group.len() + 1) > self.max_combo
            {
                close_group(&mut envelopes, &mut group);
                group_bytes = 0;
            }
            group_bytes += message.len();
            group.push(message);
        }
        close_group(&mut envelopes, &mut group);
        envelopes
    }
}

/// A batcher shared by concurrent callers behind one lock.
#[derive(Debug, Clone)]
pub struct SharedBatcher {
    inner: Arc<Mutex<ComboBatcher>>,
}

impl SharedBatcher {
    pub fn new(limits: &Limits) -> Self {
        Self { inner: Arc::new(Mutex::new(ComboBatcher::new(limits))) }
    }

    pub fn add(&self, message: WireMessage) -> Option<Envelope> {
        self.inner.lock().add(message)
    }

    pub fn flush(&self) -> Vec<Envelope> {
        self.inner.lock().flush()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

fn close_group(envelopes: &mut Vec<Envelope>, group: &mut Vec<WireMessage>) {
    match group.len() {
        0 => {}
        1 => envelopes.extend(group.drain(..).map(Envelope::Single)),
        _ => envelopes.push(Envelope::Combo(std::mem::take(group))),
    }
}

/// Length of a combo holding `count` messages totalling `bytes`.
fn combo_len(bytes: usize, count: usize) -> usize {
    COMBO_HEADER.len() + bytes + SEPARATOR.len() * count.saturating_sub(1) + 1
}

pub(crate) fn combo_text(messages: &[WireMessage]) -> String {
    let bytes = messages.iter().map(WireMessage::len).sum();
    let mut out = String::with_capacity(combo_len(bytes, messages.len()));
    out.push_str(COMBO_HEADER);
    for (idx, message) in messages.iter().enumerate() {
        if idx > 0 {
            out.push_str(SEPARATOR);
        }
        out.push_str(message.as_str());
    }
    out.push('\n');
    out
}

/// Split the body of a combo (everything after the header) into members.
///
/// A blank line only separates members when the next line starts with a
/// combinable verb, so blank lines inside a status text survive.
pub(crate) fn split_combo(body: &str) -> Vec<&str> {
    let body = body.strip_suffix('\n').unwrap_or(body);
    if body.is_empty() {
        return Vec::new();
    }

    let mut members = Vec::new();
    let mut start = 0;
    let mut search = 0;
    while let Some(found) = body[search..].find(SEPARATOR) {
        let at = search + found;
        let next = &body[at + SEPARATOR.len()..];
        if starts_member(next) {
            members.push(&body[start..at]);
            start = at + SEPARATOR.len();
        }
        search = at + 1;
    }
    members.push(&body[start..]);
    members
}

/// Whether `text` would be read back as more than one combo member.
pub(crate) fn splits_members(text: &str) -> bool {
    split_combo(text).len() > 1
}

fn starts_member(s: &str) -> bool {
    let verb = s.split([' ', '\n', '+', '/']).next().unwrap_or_default();
    matches!(verb, "status" | "data")
}

#[cfg(test)]
#[path = "combo_tests.rs"]
mod tests;
