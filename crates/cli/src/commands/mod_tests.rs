// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use xymon_client::{AttemptState, FakeConnector, FakeOutcome, RetryPolicy, TransportError};

use super::*;

fn server(host: &str) -> ServerAddr {
    ServerAddr::new(host, 1984)
}

fn client(fake: &FakeConnector, hosts: &[&str]) -> Xymon<FakeConnector> {
    hosts
        .iter()
        .fold(Xymon::builder(), |builder, host| builder.server(server(host)))
        .retry(RetryPolicy::once())
        .build_with(fake.clone())
        .unwrap()
}

#[test]
fn check_passes_when_every_server_succeeded() {
    let results: Vec<(ServerAddr, Result<(), DeliveryError>)> = vec![(server("a"), Ok(())), (server("b"), Ok(()))];
    assert!(check(&results).is_ok());
}

#[test]
fn single_failure_keeps_its_message() {
    let results: Vec<(ServerAddr, Result<(), DeliveryError>)> =
        vec![(server("a"), Ok(())), (server("b"), Err(DeliveryError::NoData { server: server("b") }))];
    let err = check(&results).unwrap_err();
    assert_eq!(err.code, codes::INVALID);
    assert_eq!(err.message, "b:1984 returned no data");
}

#[test]
fn transport_failure_wins_the_exit_code() {
    let results: Vec<(ServerAddr, Result<(), DeliveryError>)> = vec![
        (server("a"), Err(DeliveryError::NoData { server: server("a") })),
        (
            server("b"),
            Err(DeliveryError::Cancelled { server: server("b"), attempts: 1, state: AttemptState::Sending }),
        ),
    ];
    let err = check(&results).unwrap_err();
    assert_eq!(err.code, codes::DELIVERY);
    assert_eq!(err.message, "2 of 2 deliveries failed");
}

#[tokio::test]
async fn send_request_executes_against_every_server() {
    let fake = FakeConnector::new();
    let request = Request::Send(Message::Enable { target: xymon_wire::Target::test("web01", "disk").unwrap() });
    request.execute(&client(&fake, &["a", "b"]), OutputFormat::Text).await.unwrap();

    let calls = fake.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|call| call.request_text() == "enable web01.disk"));
}

#[tokio::test]
async fn refused_delivery_exits_with_delivery_code() {
    let fake = FakeConnector::scripted([FakeOutcome::Refuse]);
    let request = Request::Send(Message::Enable { target: xymon_wire::Target::test("web01", "disk").unwrap() });
    let err = request.execute(&client(&fake, &["a"]), OutputFormat::Text).await.unwrap_err();

    let exit = err.downcast_ref::<ExitError>().unwrap();
    assert_eq!(exit.code, codes::DELIVERY);
    assert!(exit.message.contains("refused"));
}

#[tokio::test]
async fn malformed_ghostlist_exits_with_invalid_code() {
    let fake = FakeConnector::scripted([FakeOutcome::Reply(b"garbage\n".to_vec())]);
    let request = Request::Query { query: Query::GhostList, view: ReplyView::Ghosts };
    let err = request.execute(&client(&fake, &["a"]), OutputFormat::Json).await.unwrap_err();
    assert_eq!(err.downcast_ref::<ExitError>().unwrap().code, codes::INVALID);
}

#[tokio::test]
async fn query_reply_views() {
    let fake = FakeConnector::scripted([
        FakeOutcome::Reply(b" 4.3.30 \n".to_vec()),
        FakeOutcome::Reply(b"web01|red\n".to_vec()),
    ]);
    let xymon = client(&fake, &["a"]);

    let version = ReplyView::Version.apply(xymon.request(Query::Ping).await.unwrap());
    assert_eq!(version.first().unwrap().unwrap(), ReplyValue::Text("4.3.30".into()));

    let rows = ReplyView::Rows.apply(xymon.request(Query::HostInfo { criteria: vec![] }).await.unwrap());
    assert_eq!(rows.first().unwrap().unwrap(), ReplyValue::Rows(vec![vec!["web01".into(), "red".into()]]));
}

#[test]
fn into_message_wraps_queries() {
    let request = Request::Query { query: Query::Ping, view: ReplyView::Version };
    assert_eq!(request.into_message(), Message::Query(Query::Ping));
}

#[test]
fn failed_delivery_names_its_attempts() {
    let err = DeliveryError::Failed {
        server: server("a"),
        attempts: 3,
        last: TransportError::Refused { server: server("a") },
    };
    assert!(ExitError::from(&err).message.contains("after 3 attempt(s)"));
}
