// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Xymon text protocol: message model, combo batching and reply parsing.
//!
//! Wire format: newline-terminated ASCII text, one request per connection.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod color;
mod combo;
mod error;
mod message;
mod parse;
mod period;
mod query;
mod reply;
mod target;
mod wire;

pub use color::Color;
pub use combo::{ComboBatcher, Envelope, SharedBatcher, COMBO_HEADER};
pub use error::ValidationError;
pub use message::{Limits, Message, MessageKind, Rename, Status, WireMessage};
pub use period::{DisableFor, Period, Unit};
pub use query::Query;
pub use reply::{Ghost, Reply, ReplyError};
pub use target::Target;
pub use wire::{decode, encode, encoded_len};

/// Default TCP port of a Xymon server
pub const DEFAULT_PORT: u16 = 1984;
