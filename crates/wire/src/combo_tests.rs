// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use similar_asserts::assert_eq;

use super::*;
use crate::{Color, Message, Status, Target, ValidationError};

fn status(host: &str, text: &str) -> WireMessage {
    let target = Target::test(host, "cpu").unwrap();
    Message::from(Status::new(target, Color::Green, text).timestamp("t"))
        .encode(&Limits::default())
        .unwrap()
}

fn client(host: &str) -> WireMessage {
    Message::Client { host: host.into(), section: "df".into(), payload: "/ 10%".into() }
        .encode(&Limits::default())
        .unwrap()
}

fn batcher(max_combo: usize) -> ComboBatcher {
    ComboBatcher::new(&Limits::new(max_combo.min(4096), max_combo).unwrap())
}

#[test]
fn three_small_statuses_share_one_envelope() {
    let mut batcher = batcher(4096);
    let messages = vec![status("a", "ok"), status("b", "ok"), status("c", "ok")];
    for message in &messages {
        assert!(batcher.add(message.clone()).is_none());
    }
    assert_eq!(batcher.len(), 3);

    let envelopes = batcher.flush();
    assert_eq!(envelopes.len(), 1);
    assert_eq!(envelopes[0].messages(), messages.as_slice());
    assert_eq!(
        envelopes[0].payload(),
        "combo\nstatus a.cpu green t ok\n\nstatus b.cpu green t ok\n\nstatus c.cpu green t ok\n"
    );
    assert_eq!(envelopes[0].len(), envelopes[0].payload().len());
    assert!(batcher.is_empty());
}

#[test]
fn uncombinable_messages_bypass_the_queue() {
    let mut batcher = batcher(4096);
    assert!(batcher.add(status("a", "ok")).is_none());
    let immediate = batcher.add(client("web01")).unwrap();
    assert_eq!(immediate, Envelope::Single(client("web01")));
    assert_eq!(batcher.len(), 1);
}

#[test]
fn single_pending_message_is_sent_plain() {
    let mut batcher = batcher(4096);
    batcher.add(status("a", "ok"));
    let envelopes = batcher.flush();
    assert_eq!(envelopes, vec![Envelope::Single(status("a", "ok"))]);
    assert_eq!(envelopes[0].payload(), "status a.cpu green t ok");
}

#[test]
fn flush_of_empty_queue_is_empty() {
    assert!(batcher(4096).flush().is_empty());
}

#[test]
fn splits_when_limit_is_reached() {
    // Each status is 23 bytes; a combo of two is 6 + 46 + 2 + 1 = 55 bytes
    let mut batcher = batcher(60);
    let messages: Vec<_> = ["a", "b", "c", "d", "e"].iter().map(|h| status(h, "ok")).collect();
    for message in &messages {
        batcher.add(message.clone());
    }
    let envelopes = batcher.flush();
    assert_eq!(envelopes.len(), 3);
    assert!(matches!(&envelopes[0], Envelope::Combo(m) if m.len() == 2));
    assert!(matches!(&envelopes[1], Envelope::Combo(m) if m.len() == 2));
    assert!(matches!(&envelopes[2], Envelope::Single(_)));
    for envelope in &envelopes {
        assert!(envelope.len() <= 60, "envelope of {} bytes", envelope.len());
    }
    let flattened: Vec<_> = envelopes.iter().flat_map(|e| e.messages().to_vec()).collect();
    assert_eq!(flattened, messages);
}

#[test]
fn message_too_big_for_any_combo_goes_alone_in_order() {
    // max_message 4096 but combo limit tiny: the big one cannot be wrapped
    let mut batcher = ComboBatcher { max_combo: 64, pending: Vec::new() };
    let small_a = status("a", "ok");
    let big = status("b", &"x".repeat(80));
    let small_c = status("c", "ok");
    let small_d = status("d", "ok");
    for message in [&small_a, &big, &small_c, &small_d] {
        batcher.add(message.clone());
    }
    let envelopes = batcher.flush();
    assert_eq!(
        envelopes,
        vec![
            Envelope::Single(small_a),
            Envelope::Single(big),
            Envelope::Combo(vec![small_c, small_d]),
        ]
    );
}

#[test]
fn split_combo_respects_blank_lines_inside_text() {
    let body = "status a.cpu green t one\n\nstill one\n\ndata a.trends\nx\n\nstatus+5m b.cpu red t two\n";
    assert_eq!(
        split_combo(body),
        vec![
            "status a.cpu green t one\n\nstill one",
            "data a.trends\nx",
            "status+5m b.cpu red t two",
        ]
    );
}

#[test]
fn member_lookalike_in_text_is_detected() {
    assert!(splits_members("ok\n\nstatus evil.cpu red injected"));
    assert!(splits_members("ok\n\n\ndata evil.trends\nx"));
    assert!(!splits_members("ok\n\nstill ok\n\nstatuses are fine"));
    assert!(!splits_members("ok\nstatus on one line"));
}

#[test]
fn text_that_would_split_a_combo_is_never_queued() {
    let target = Target::test("web01", "disk").unwrap();
    let injected = Message::from(
        Status::new(target, Color::Green, "ok\n\nstatus evil.cpu red injected").timestamp("t"),
    )
    .encode(&Limits::default());
    assert!(matches!(injected, Err(ValidationError::InvalidField { field: "status", .. })));

    let mut batcher = ComboBatcher::new(&Limits::default());
    batcher.add(status("web01", "ok\n\nstill ok"));
    batcher.add(status("web02", "fine"));
    let envelopes = batcher.flush();
    assert_eq!(envelopes.len(), 1);
    let Message::Combo(members) = envelopes[0].payload().parse::<Message>().unwrap() else {
        panic!("expected a combo");
    };
    assert_eq!(members.len(), 2);
}

#[test]
fn shared_batcher_is_safe_across_threads() {
    let shared = SharedBatcher::new(&Limits::default());
    let handles: Vec<_> = (0..4)
        .map(|n| {
            let shared = shared.clone();
            std::thread::spawn(move || {
                for i in 0..25 {
                    shared.add(status(&format!("h{n}x{i}"), "ok"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(shared.len(), 100);
    let total: usize = shared.flush().iter().map(|e| e.messages().len()).sum();
    assert_eq!(total, 100);
    assert!(shared.is_empty());
}

#[test]
fn combo_envelopes_never_expect_replies() {
    let envelope = Envelope::Combo(vec![status("a", "ok"), status("b", "ok")]);
    assert!(!envelope.expects_reply());
    assert_eq!(envelope.kind(), MessageKind::Combo);
}
