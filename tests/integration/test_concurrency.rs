//! Concurrency tests for mentoring status transitions.
//!
//! Competing actions on the same request race through the server; exactly
//! one of them may win and the stored status must match the winner.

use std::net::TcpListener;
use std::time::Duration;

use futures::future::join_all;
use mentos_api::{create_router, AppState, Config, MemberSeed};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const MENTOR: i64 = 1;
const MENTI: i64 = 2;

fn find_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind to port")
        .local_addr()
        .expect("Failed to get local addr")
        .port()
}

async fn spawn_test_server() -> (String, tokio::task::JoinHandle<()>) {
    let config = Config {
        members: vec![
            MemberSeed {
                id: MENTOR,
                nickname: "kim".to_string(),
            },
            MemberSeed {
                id: MENTI,
                nickname: "lee".to_string(),
            },
        ],
        ..Config::default()
    };
    let router = create_router(AppState::new(config).expect("valid config"));

    let addr = format!("127.0.0.1:{}", find_available_port());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server failed");
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    (format!("http://{addr}"), handle)
}

async fn register(client: &Client, base: &str) -> i64 {
    let body: Value = client
        .post(format!("{base}/mentoring/registration"))
        .header("x-member-id", MENTI.to_string())
        .json(&json!({ "mentoId": MENTOR }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["result"]["mentoringId"].as_i64().unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_decisions_have_one_winner() {
    let (base, server) = spawn_test_server().await;
    let client = Client::new();
    let id = register(&client, &base).await;

    let attempts = (0..16).map(|i| {
        let client = client.clone();
        let url = format!(
            "{base}/mentoring/acceptance?mentoringId={id}&accept={}",
            i % 2 == 0
        );
        async move {
            let response = client
                .patch(url)
                .header("x-member-id", MENTOR.to_string())
                .send()
                .await
                .unwrap();
            let status = response.status();
            let body: Value = response.json().await.unwrap();
            (status, body)
        }
    });
    let results = join_all(attempts).await;

    let winners: Vec<&Value> = results
        .iter()
        .filter(|(status, _)| *status == StatusCode::OK)
        .map(|(_, body)| body)
        .collect();
    assert_eq!(winners.len(), 1, "{results:?}");
    assert!(results
        .iter()
        .filter(|(status, _)| *status != StatusCode::OK)
        .all(|(status, body)| *status == StatusCode::CONFLICT && body["code"] == 3034));

    // A follow-up stop only works if the winner was an accept
    let won_with = winners[0]["result"]["status"].as_str().unwrap().to_string();
    let stop = client
        .patch(format!("{base}/mentoring/stop?mentoringId={id}"))
        .header("x-member-id", MENTI.to_string())
        .send()
        .await
        .unwrap();
    if won_with == "ACCEPTED" {
        assert_eq!(stop.status(), StatusCode::OK);
    } else {
        assert_eq!(won_with, "REJECTED");
        assert_eq!(stop.status(), StatusCode::CONFLICT);
    }

    server.abort();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cancel_races_accept() {
    let (base, server) = spawn_test_server().await;
    let client = Client::new();
    let id = register(&client, &base).await;

    let accept = client
        .patch(format!(
            "{base}/mentoring/acceptance?mentoringId={id}&accept=true"
        ))
        .header("x-member-id", MENTOR.to_string())
        .send();
    let cancel = client
        .delete(format!("{base}/mentoring/cancel?mentoringId={id}"))
        .header("x-member-id", MENTI.to_string())
        .send();

    let (accept, cancel) = tokio::join!(accept, cancel);
    let statuses = [accept.unwrap().status(), cancel.unwrap().status()];

    assert_eq!(
        statuses.iter().filter(|s| **s == StatusCode::OK).count(),
        1,
        "{statuses:?}"
    );
    assert!(statuses.contains(&StatusCode::CONFLICT));

    server.abort();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_get_distinct_ids() {
    let (base, server) = spawn_test_server().await;
    let client = Client::new();

    let ids = join_all((0..20).map(|_| register(&client, &base))).await;

    let mut unique = ids.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
    assert!(ids.iter().all(|id| *id > 0));

    server.abort();
}
