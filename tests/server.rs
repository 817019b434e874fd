//! Integration tests for the HTTP surface: loader, matching, and health.

use std::net::SocketAddr;
use std::sync::Arc;

use ghost::error::{ErrorBody, LoaderBody};
use ghost::health::HealthResponse;
use ghost::mock::{Mock, MockRegistry};
#[cfg(feature = "yaml")]
use ghost::mock::{bundle::FileBundle, Mocker};
use ghost::server::{self, AppState};

const GOOD_MOCK: &str = r#"{"endPoint":"/test/good","request":{"verb":"POST","headers":{"content-type":"application/json"},"body":{}},"response":{"status":201,"headers":{"content-type":"application/json"},"body":{"hello":"world"}}}"#;

async fn start_test_server(
    mocks: Vec<Mock>,
) -> (SocketAddr, Arc<AppState>, tokio::sync::oneshot::Sender<()>) {
    let registry = MockRegistry::new();
    for mock in mocks {
        registry.upsert(mock).await;
    }
    let state = Arc::new(AppState::new(registry));

    let router = server::build_router(state.clone(), 1_048_576);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    (addr, state, shutdown_tx)
}

fn good_data_mock() -> Mock {
    serde_json::from_str(
        r#"{
            "endPoint": "/good/data",
            "request": {
                "verb": "POST",
                "headers": {"content-type": "application/json"},
                "body": {"testKey": "test value"}
            },
            "response": {
                "status": 201,
                "headers": {"content-type": "application/json"},
                "body": {"hello": "world"}
            }
        }"#,
    )
    .unwrap()
}

#[tokio::test]
async fn load_then_match_round_trip() {
    let (addr, _state, shutdown) = start_test_server(vec![]).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{addr}/load/mock"))
        .body(GOOD_MOCK)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: LoaderBody = resp.json().await.unwrap();
    assert_eq!(body.status_code, 201);
    assert_eq!(body.status, "Created");

    let resp = client
        .post(format!("http://{addr}/test/good"))
        .header("content-type", "application/json")
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/json"
    );
    assert_eq!(resp.text().await.unwrap(), r#"{"hello":"world"}"#);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn loader_rejects_non_post() {
    let (addr, state, shutdown) = start_test_server(vec![]).await;

    let resp = reqwest::get(format!("http://{addr}/load/mock")).await.unwrap();
    assert_eq!(resp.status(), 405);
    let body: LoaderBody = resp.json().await.unwrap();
    assert_eq!(body.status_code, 405);
    assert!(state.registry.is_empty().await);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn loader_rejects_broken_body_without_registering() {
    let (addr, state, shutdown) = start_test_server(vec![]).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{addr}/load/mock"))
        .body(&GOOD_MOCK[..35])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: LoaderBody = resp.json().await.unwrap();
    assert_eq!(body.status_code, 400);
    assert!(state.registry.is_empty().await);

    let resp = client
        .post(format!("http://{addr}/load/mock"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert!(state.registry.is_empty().await);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn loader_zero_fills_omitted_fields() {
    let (addr, state, shutdown) = start_test_server(vec![]).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{addr}/load/mock"))
        .body(r#"{"endPoint":"/x","request":{"verb":"GET"}}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    assert_eq!(state.registry.keys().await, vec!["/x-GET".to_string()]);

    let resp = client.get(format!("http://{addr}/x")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn loading_same_key_twice_keeps_the_second() {
    let (addr, state, shutdown) = start_test_server(vec![]).await;
    let client = reqwest::Client::new();

    let second = GOOD_MOCK.replace(r#""hello":"world""#, r#""hello":"again""#);
    for payload in [GOOD_MOCK.to_string(), second] {
        let resp = client
            .post(format!("http://{addr}/load/mock"))
            .body(payload)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
    }
    assert_eq!(state.registry.len().await, 1);

    let resp = client
        .post(format!("http://{addr}/test/good"))
        .header("content-type", "application/json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.text().await.unwrap(), r#"{"hello":"again"}"#);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn unknown_route_returns_400_naming_url_and_method() {
    let (addr, _state, shutdown) = start_test_server(vec![]).await;

    let resp = reqwest::get(format!("http://{addr}/anything")).await.unwrap();
    assert_eq!(resp.status(), 400);
    let body: ErrorBody = resp.json().await.unwrap();
    assert_eq!(body.status_code, 400);
    assert_eq!(body.status, "Bad Request");
    assert!(body.detail.contains("/anything"));
    assert!(body.detail.contains("GET"));

    let _ = shutdown.send(());
}

#[tokio::test]
async fn method_and_trailing_slash_are_part_of_the_key() {
    let (addr, _state, shutdown) = start_test_server(vec![good_data_mock()]).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("http://{addr}/good/data"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client
        .post(format!("http://{addr}/good/data/"))
        .header("content-type", "application/json")
        .body(r#"{"testKey":"test value"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn matching_request_gets_mock_response() {
    let (addr, state, shutdown) = start_test_server(vec![good_data_mock()]).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/good/data"))
        .header("content-type", "application/json")
        .header("x-unrelated", "ignored")
        .body(r#"{"testKey":"test value","extra":true}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    assert_eq!(resp.text().await.unwrap(), r#"{"hello":"world"}"#);
    assert_eq!(
        state.stats.matched.load(std::sync::atomic::Ordering::Relaxed),
        1
    );

    let _ = shutdown.send(());
}

#[tokio::test]
async fn wrong_body_value_is_not_acceptable() {
    let (addr, _state, shutdown) = start_test_server(vec![good_data_mock()]).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/good/data"))
        .header("content-type", "application/json")
        .body(r#"{"testKey":"wrong"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 406);
    let body: ErrorBody = resp.json().await.unwrap();
    assert_eq!(body.status, "Not Acceptable");
    assert!(body.detail.starts_with("Request Body does not meet expectations"));

    let _ = shutdown.send(());
}

#[tokio::test]
async fn empty_body_fails_body_expectation() {
    let (addr, _state, shutdown) = start_test_server(vec![good_data_mock()]).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/good/data"))
        .header("content-type", "application/json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 406);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn missing_authorization_header_is_not_acceptable() {
    let mut mock = good_data_mock();
    mock.request.headers.insert(
        "authorization".into(),
        ghost::mock::PropertyValue::text("bearer xxxxxx"),
    );
    let (addr, _state, shutdown) = start_test_server(vec![mock]).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/good/data"))
        .header("content-type", "application/json")
        .body(r#"{"testKey":"test value"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 406);
    let body: ErrorBody = resp.json().await.unwrap();
    assert!(body.detail.starts_with("Request Headers do not meet expectations"));

    let _ = shutdown.send(());
}

#[tokio::test]
async fn header_names_match_case_insensitively() {
    let mut mock = good_data_mock();
    mock.request.headers.clear();
    mock.request.headers.insert(
        "Content-Type".into(),
        ghost::mock::PropertyValue::text("application/json"),
    );
    let (addr, _state, shutdown) = start_test_server(vec![mock]).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/good/data"))
        .header("content-type", "application/json")
        .body(r#"{"testKey":"test value"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn query_string_is_part_of_the_key() {
    let mock: Mock = serde_json::from_str(
        r#"{"endPoint": "/users?active=true", "request": {"verb": "GET"}, "response": {"status": 200, "body": {"count": 1}}}"#,
    )
    .unwrap();
    let (addr, _state, shutdown) = start_test_server(vec![mock]).await;

    let resp = reqwest::get(format!("http://{addr}/users?active=true"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), r#"{"count":1}"#);

    let resp = reqwest::get(format!("http://{addr}/users")).await.unwrap();
    assert_eq!(resp.status(), 400);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn text_plain_response_is_literal() {
    let mock: Mock = serde_json::from_str(
        r#"{
            "endPoint": "/token",
            "request": {"verb": "GET"},
            "response": {"status": 200, "headers": {"Content-Type": "text/plain"}, "body": {"abc.def.ghi": null}}
        }"#,
    )
    .unwrap();
    let (addr, _state, shutdown) = start_test_server(vec![mock]).await;

    let resp = reqwest::get(format!("http://{addr}/token")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers().get("content-type").unwrap(), "text/plain");
    assert_eq!(resp.text().await.unwrap(), "abc.def.ghi");

    let _ = shutdown.send(());
}

#[cfg(feature = "yaml")]
#[tokio::test]
async fn remedy_form_login_then_logout() {
    let bundle = FileBundle::load(std::path::Path::new("demos/remedy.yaml"))
        .await
        .unwrap();
    let mocks = bundle.mocks();
    let login = mocks
        .iter()
        .find(|m| m.end_point == "/api/jwt/login")
        .unwrap();
    let token = login.response.body.keys().next().unwrap().clone();
    let (addr, _state, shutdown) = start_test_server(mocks).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{addr}/api/jwt/login"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("username=admin&password=password&authString=")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers().get("content-type").unwrap(), "text/plain");
    assert_eq!(resp.text().await.unwrap(), token);

    let resp = client
        .post(format!("http://{addr}/api/jwt/login"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("username=admin&password=wrong&authString=")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 406);

    let resp = client
        .post(format!("http://{addr}/api/jwt/logout"))
        .header("authorization", format!("AR-JWT {token}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);
    assert!(resp.text().await.unwrap().is_empty());

    let _ = shutdown.send(());
}

#[tokio::test]
async fn health_reports_mocks_and_stats() {
    let (addr, _state, shutdown) = start_test_server(vec![good_data_mock()]).await;

    let _ = reqwest::get(format!("http://{addr}/nothing-here")).await.unwrap();

    let resp = reqwest::get(format!("http://{addr}/_ghost/health"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let health: HealthResponse = resp.json().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(health.mocks, 1);
    assert_eq!(health.stats.requests_rejected, 1);
    assert_eq!(health.stats.requests_matched, 0);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn graceful_shutdown_works() {
    let (addr, _state, shutdown) = start_test_server(vec![]).await;

    let url = format!("http://{addr}/_ghost/health");
    assert!(reqwest::get(&url).await.is_ok());

    let _ = shutdown.send(());

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let result = reqwest::get(&url).await;
    assert!(result.is_err());
}
