//! In-process stand-in for the booking service.
//!
//! Serves the left-ticket query and station list endpoints on an ephemeral
//! local port, counts hits, and records the query parameters it received.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::json;

use ticket_watch::query::decode::fields;
use ticket_watch::query::{EXPECTED_CONTENT_TYPE, RetryPolicy};

/// Body of the station list endpoint.
pub const STATION_LIST: &str = "var station_names ='@shhq|上海虹桥|AOH|shanghaihongqiao|shhq|0@cz|常州|CZH|changzhou|cz|1@czb|常州北|ESH|changzhoubei|czb|2';";

/// One canned HTTP response.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    /// 200 with the service's content type and the given tickets.
    pub fn tickets(records: &[String]) -> Self {
        Self::json(json!({ "data": { "result": records }, "messages": [] }).to_string())
    }

    /// 200 with the service's content type and business messages.
    pub fn messages(messages: &[&str]) -> Self {
        Self::json(json!({ "data": {}, "messages": messages }).to_string())
    }

    pub fn json(body: String) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: EXPECTED_CONTENT_TYPE,
            body,
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            content_type: "text/html",
            body: "<html>busy</html>".to_string(),
        }
    }
}

type ReplyFn = dyn Fn(usize) -> Reply + Send + Sync;

#[derive(Clone)]
struct StubState {
    hits: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    replies: Arc<ReplyFn>,
}

/// A running stub server.
pub struct StubServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl StubServer {
    /// Start a server whose n-th query (0-indexed) is answered by `replies(n)`.
    pub async fn start(replies: impl Fn(usize) -> Reply + Send + Sync + 'static) -> Self {
        let state = StubState {
            hits: Arc::new(AtomicUsize::new(0)),
            queries: Arc::new(Mutex::new(Vec::new())),
            replies: Arc::new(replies),
        };

        let app = Router::new()
            .route("/otn/leftTicket/query", get(handle_query))
            .route(
                "/otn/resources/js/framework/station_name.js",
                get(|| async { STATION_LIST }),
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            hits: state.hits,
            queries: state.queries,
        }
    }

    /// Start a server that always gives the same reply.
    pub async fn always(reply: Reply) -> Self {
        Self::start(move |_| reply.clone()).await
    }

    /// Number of ticket queries received.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Query parameters of every ticket query received.
    pub fn queries(&self) -> Vec<HashMap<String, String>> {
        self.queries.lock().unwrap().clone()
    }
}

async fn handle_query(
    State(state): State<StubState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let n = state.hits.fetch_add(1, Ordering::SeqCst);
    state.queries.lock().unwrap().push(params);
    let reply = (state.replies)(n);
    (
        reply.status,
        [(header::CONTENT_TYPE, reply.content_type)],
        reply.body,
    )
        .into_response()
}

/// Base URL nothing is listening on.
pub async fn closed_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Retry policy small enough for tests running on the real clock.
pub fn quick_retry(budget: Duration) -> RetryPolicy {
    RetryPolicy::default()
        .with_initial_delay(Duration::from_millis(10))
        .with_max_delay(Duration::from_millis(100))
        .with_max_elapsed(budget)
}

/// A ticket record for 2024-06-01 with the given fields.
pub fn record(
    train: &str,
    from: &str,
    to: &str,
    depart: &str,
    second_class: &str,
    standing: &str,
) -> String {
    let mut tab = vec![""; 36];
    tab[0] = "secret";
    tab[fields::STATUS] = "预订";
    tab[fields::TRAIN] = train;
    tab[fields::FROM] = from;
    tab[fields::TO] = to;
    tab[fields::DEPART] = depart;
    tab[fields::ARRIVE] = "23:00";
    tab[fields::DATE] = "20240601";
    tab[fields::STANDING] = standing;
    tab[fields::SECOND_CLASS] = second_class;
    tab.join("|")
}
