mod common;

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use chrono::NaiveDate;

use common::{Reply, StubServer, closed_base_url, quick_retry, record};
use ticket_watch::domain::{SeatCount, StationCode, TicketQuery};
use ticket_watch::query::{DecodePolicy, QueryError, TicketClient, TicketClientConfig};
use ticket_watch::stations::{NonInteractive, StationClient, StationClientConfig};

fn code(s: &str) -> StationCode {
    StationCode::parse(s).unwrap()
}

fn query() -> TicketQuery {
    TicketQuery::new(
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        code("AOH"),
        code("CZH"),
    )
}

fn client(base_url: &str, budget: Duration) -> TicketClient {
    let config = TicketClientConfig::default()
        .with_base_url(base_url)
        .with_timeout(5)
        .with_retry(quick_retry(budget));
    TicketClient::new(config).unwrap()
}

#[tokio::test]
async fn decodes_tickets_from_service() {
    let server = StubServer::always(Reply::tickets(&[
        record("G7001", "AOH", "CZH", "08:00", "有", "无"),
        record("G7003", "AOH", "CZH", "24:00", "12", "*"),
    ]))
    .await;

    let tickets = client(&server.base_url, Duration::from_secs(1))
        .query(&query())
        .await
        .unwrap();

    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[0].train, "G7001");
    assert_eq!(tickets[0].second_class, SeatCount::Unspecified);
    assert_eq!(tickets[0].standing, SeatCount::SoldOut);
    assert_eq!(tickets[1].second_class, SeatCount::from_count(12));
    assert_eq!(tickets[1].depart.format("%H:%M").to_string(), "23:59");
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn sends_route_and_date_parameters() {
    let server = StubServer::always(Reply::tickets(&[])).await;

    client(&server.base_url, Duration::from_secs(1))
        .query(&query())
        .await
        .unwrap();

    let queries = server.queries();
    assert_eq!(queries.len(), 1);
    let params = &queries[0];
    assert_eq!(params["leftTicketDTO.train_date"], "2024-06-01");
    assert_eq!(params["leftTicketDTO.from_station"], "AOH");
    assert_eq!(params["leftTicketDTO.to_station"], "CZH");
    assert_eq!(params["purpose_codes"], "ADULT");
}

#[tokio::test]
async fn business_messages_are_not_retried() {
    let server = StubServer::always(Reply::messages(&["该时间段不能预订"])).await;

    let err = client(&server.base_url, Duration::from_secs(2))
        .query(&query())
        .await
        .unwrap_err();

    match &err {
        QueryError::Business { messages } => assert_eq!(messages, &["该时间段不能预订"]),
        other => panic!("expected business error, got {other:?}"),
    }
    assert_eq!(err.to_string(), "service message: 该时间段不能预订");
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn business_message_with_null_data_is_not_retried() {
    let body = r#"{"data":null,"messages":["该时间段不能预订"]}"#.to_string();
    let server = StubServer::always(Reply::json(body)).await;

    let err = client(&server.base_url, Duration::from_millis(300))
        .query(&query())
        .await
        .unwrap_err();

    assert!(matches!(err, QueryError::Business { .. }), "got {err:?}");
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn null_messages_still_yield_tickets() {
    let records = [record("G1", "AOH", "CZH", "08:00", "有", "无")];
    let body = serde_json::json!({ "data": { "result": records }, "messages": null });
    let server = StubServer::always(Reply::json(body.to_string())).await;

    let tickets = client(&server.base_url, Duration::from_millis(300))
        .query(&query())
        .await
        .unwrap();

    assert_eq!(tickets.len(), 1);
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn retries_bad_status_until_success() {
    let server = StubServer::start(|n| match n {
        0 | 1 => Reply::status(StatusCode::SERVICE_UNAVAILABLE),
        _ => Reply::tickets(&[record("G1", "AOH", "CZH", "08:00", "有", "有")]),
    })
    .await;

    let tickets = client(&server.base_url, Duration::from_secs(5))
        .query(&query())
        .await
        .unwrap();

    assert_eq!(tickets.len(), 1);
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn retries_wrong_content_type() {
    let server = StubServer::start(|n| {
        let mut reply = Reply::tickets(&[record("G1", "AOH", "CZH", "08:00", "有", "有")]);
        if n == 0 {
            reply.content_type = "text/html;charset=UTF-8";
        }
        reply
    })
    .await;

    let tickets = client(&server.base_url, Duration::from_secs(5))
        .query(&query())
        .await
        .unwrap();

    assert_eq!(tickets.len(), 1);
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn fetch_once_reports_content_type() {
    let mut reply = Reply::tickets(&[]);
    reply.content_type = "application/json";
    let server = StubServer::always(reply).await;

    let err = client(&server.base_url, Duration::from_secs(1))
        .fetch_once(&query())
        .await
        .unwrap_err();

    match err {
        QueryError::ContentType { found } => {
            assert_eq!(found.as_deref(), Some("application/json"));
        }
        other => panic!("expected content type error, got {other:?}"),
    }
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn persistent_failure_exhausts_budget() {
    let server = StubServer::always(Reply::status(StatusCode::INTERNAL_SERVER_ERROR)).await;
    let budget = Duration::from_millis(300);
    let start = Instant::now();

    let err = client(&server.base_url, budget)
        .query(&query())
        .await
        .unwrap_err();

    let elapsed = start.elapsed();
    match err {
        QueryError::RetryBudgetExceeded { attempts, last, .. } => {
            assert!(attempts > 1);
            assert!(matches!(*last, QueryError::Status { status: 500, .. }));
        }
        other => panic!("expected exhausted budget, got {other:?}"),
    }
    assert!(server.hits() > 1);
    assert!(elapsed >= budget);
    assert!(elapsed < Duration::from_secs(5));
}

#[tokio::test]
async fn unreachable_service_exhausts_budget() {
    let base_url = closed_base_url().await;
    let budget = Duration::from_millis(300);
    let start = Instant::now();

    let err = client(&base_url, budget).query(&query()).await.unwrap_err();

    match err {
        QueryError::RetryBudgetExceeded { last, .. } => {
            assert!(matches!(*last, QueryError::Http(_)));
        }
        other => panic!("expected exhausted budget, got {other:?}"),
    }
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn strict_policy_drops_malformed_records() {
    let server = StubServer::always(Reply::tickets(&[
        record("G1", "AOH", "CZH", "08:00", "有", "无"),
        record("G3", "AOH", "CZH", "8点", "有", "无"),
        record("G5", "AOH", "CZH", "09:00", "很多", "无"),
    ]))
    .await;
    let config = TicketClientConfig::default()
        .with_base_url(&server.base_url)
        .with_decode_policy(DecodePolicy::Strict)
        .with_retry(quick_retry(Duration::from_secs(1)));

    let tickets = TicketClient::new(config)
        .unwrap()
        .query(&query())
        .await
        .unwrap();

    let trains: Vec<_> = tickets.iter().map(|t| t.train.as_str()).collect();
    assert_eq!(trains, ["G1"]);
}

#[tokio::test]
async fn lenient_policy_zeroes_malformed_fields() {
    let server = StubServer::always(Reply::tickets(&[record(
        "G5", "AOH", "CZH", "8点", "很多", "无",
    )]))
    .await;

    let tickets = client(&server.base_url, Duration::from_secs(1))
        .query(&query())
        .await
        .unwrap();

    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].depart, Default::default());
    assert_eq!(tickets[0].second_class, SeatCount::SoldOut);
}

#[tokio::test]
async fn station_list_fetch_and_resolve() {
    let server = StubServer::always(Reply::tickets(&[])).await;
    let config = StationClientConfig::default()
        .with_base_url(&server.base_url)
        .with_timeout(5);

    let directory = StationClient::new(config)
        .unwrap()
        .fetch_all()
        .await
        .unwrap();

    assert_eq!(directory.len(), 3);
    let hongqiao = directory.resolve("虹桥", &NonInteractive).unwrap();
    assert_eq!(hongqiao.code, code("AOH"));
    assert!(directory.resolve("常州", &NonInteractive).is_err());
    let changzhou = directory.resolve("^常州$", &NonInteractive).unwrap();
    assert_eq!(changzhou.code, code("CZH"));
}
