//! End-to-end tests for the mentoring and complaint endpoints.
//!
//! Each test spawns the real server on a free port and talks to it over
//! HTTP, the way the gateway would.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use mentos_api::{create_router, AppState, Config, HeaderIdentity, MemberSeed};
use mentos_complaint::TracingMailSender;
use mentos_mentoring::InMemoryRecordStore;
use mentos_mentoring::MemberId;
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};

const MENTOR: i64 = 10;
const MENTI: i64 = 20;
const OUTSIDER: i64 = 30;

/// Helper to find an available port for testing.
fn find_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind to port")
        .local_addr()
        .expect("Failed to get local addr")
        .port()
}

fn test_config() -> Config {
    Config {
        members: vec![
            MemberSeed {
                id: MENTOR,
                nickname: "mentor-kim".to_string(),
            },
            MemberSeed {
                id: MENTI,
                nickname: "menti-lee".to_string(),
            },
            MemberSeed {
                id: OUTSIDER,
                nickname: "outsider-park".to_string(),
            },
        ],
        ..Config::default()
    }
}

/// Spawns the test server and returns its base URL.
async fn spawn_test_server(state: AppState) -> (String, tokio::task::JoinHandle<()>) {
    let port = find_available_port();
    let addr = format!("127.0.0.1:{port}");

    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server failed");
    });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    (format!("http://{addr}"), handle)
}

/// Sends a request as `actor` and returns the status and parsed envelope.
async fn call(
    client: &Client,
    method: Method,
    url: String,
    actor: i64,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = client
        .request(method, url)
        .header("x-member-id", actor.to_string());
    if let Some(body) = body {
        request = request.json(&body);
    }
    let response = request.send().await.expect("Request failed");
    let status = response.status();
    let envelope = response.json().await.expect("Response is not JSON");
    (status, envelope)
}

#[tokio::test]
async fn test_full_mentoring_lifecycle() {
    let (base, server) = spawn_test_server(AppState::new(test_config()).unwrap()).await;
    let client = Client::new();

    // Menti looks up the nicknames before asking
    let (status, body) = call(
        &client,
        Method::GET,
        format!("{base}/mentoring/registration/nickname?mentoId={MENTOR}"),
        MENTI,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["mentoNickname"], "mentor-kim");
    assert_eq!(body["result"]["mentiNickname"], "menti-lee");

    // Menti asks for mentoring
    let (status, body) = call(
        &client,
        Method::POST,
        format!("{base}/mentoring/registration"),
        MENTI,
        Some(json!({ "mentoId": MENTOR })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["result"]["mentoringId"].as_i64().unwrap();

    // An outsider cannot decide it
    let (status, body) = call(
        &client,
        Method::PATCH,
        format!("{base}/mentoring/acceptance?mentoringId={id}&accept=true"),
        OUTSIDER,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["isSuccess"], false);

    // Mentor accepts
    let (status, body) = call(
        &client,
        Method::PATCH,
        format!("{base}/mentoring/acceptance?mentoringId={id}&accept=true"),
        MENTOR,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["status"], "ACCEPTED");

    // Cancel is no longer possible once accepted
    let (status, _) = call(
        &client,
        Method::DELETE,
        format!("{base}/mentoring/cancel?mentoringId={id}"),
        MENTI,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Mentor stops it
    let (status, body) = call(
        &client,
        Method::PATCH,
        format!("{base}/mentoring/stop?mentoringId={id}"),
        MENTOR,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["status"], "STOPPED");

    // Stopped is terminal
    let (status, body) = call(
        &client,
        Method::PATCH,
        format!("{base}/mentoring/acceptance?mentoringId={id}&accept=false"),
        MENTOR,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 3034);

    server.abort();
}

#[tokio::test]
async fn test_pending_request_can_be_cancelled_and_re_requested() {
    let (base, server) = spawn_test_server(AppState::new(test_config()).unwrap()).await;
    let client = Client::new();

    let (_, body) = call(
        &client,
        Method::POST,
        format!("{base}/mentoring/registration"),
        MENTI,
        Some(json!({ "mentoId": MENTOR })),
    )
    .await;
    let first = body["result"]["mentoringId"].as_i64().unwrap();

    // Only the menti may cancel
    let (status, _) = call(
        &client,
        Method::DELETE,
        format!("{base}/mentoring/cancel?mentoringId={first}"),
        MENTOR,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(
        &client,
        Method::DELETE,
        format!("{base}/mentoring/cancel?mentoringId={first}"),
        MENTI,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], mentos_api::CANCEL_CONFIRMATION);

    // A fresh request gets a new id
    let (status, body) = call(
        &client,
        Method::POST,
        format!("{base}/mentoring/registration"),
        MENTI,
        Some(json!({ "mentoId": MENTOR })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["result"]["mentoringId"].as_i64().unwrap() > first);

    server.abort();
}

#[tokio::test]
async fn test_requests_without_identity_are_rejected() {
    let (base, server) = spawn_test_server(AppState::new(test_config()).unwrap()).await;

    let response = Client::new()
        .post(format!("{base}/mentoring/registration"))
        .json(&json!({ "mentoId": MENTOR }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], 2001);

    server.abort();
}

#[tokio::test]
async fn test_custom_identity_header() {
    let config = Config {
        identity_header: "x-user-id".to_string(),
        ..test_config()
    };
    let (base, server) = spawn_test_server(AppState::new(config).unwrap()).await;

    let response = Client::new()
        .post(format!("{base}/mentoring/registration"))
        .header("x-user-id", MENTI.to_string())
        .json(&json!({ "mentoId": MENTOR }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    server.abort();
}

#[tokio::test]
async fn test_complaint_reaches_mail_sender() {
    let config = test_config();
    let mailer = Arc::new(TracingMailSender::new());
    let store = InMemoryRecordStore::with_members([(MemberId(MENTI), "menti-lee".to_string())]);
    let state = AppState::with_components(
        config.clone(),
        Arc::new(store),
        Arc::new(HeaderIdentity::from_name(&config.identity_header).unwrap()),
        mailer.clone(),
    );
    let (base, server) = spawn_test_server(state).await;

    let (status, body) = call(
        &Client::new(),
        Method::POST,
        format!("{base}/complaint"),
        MENTI,
        Some(json!({ "flag": 2, "number": OUTSIDER, "text": "fake profile" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["category"], "profile");

    let sent = mailer.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "report@mentos.app");
    assert!(sent[0].body.contains("fake profile"));
    assert!(sent[0].body.contains(&format!("actor id = {MENTI}")));

    server.abort();
}
