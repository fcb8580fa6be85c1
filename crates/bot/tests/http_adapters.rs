//! Fetcher and notifier against an in-process HTTP server.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use homework_bot::{
    run_cycle, CycleOutcome, FetchError, HttpStatusFetcher, LoopState, Notifier, NotifyError,
    StatusSource, TelegramNotifier,
};
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct Seen {
    requests: Arc<Mutex<Vec<(Option<String>, Option<String>)>>>,
    messages: Arc<Mutex<Vec<Value>>>,
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn statuses(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    seen.requests
        .lock()
        .unwrap()
        .push((auth, params.get("from_date").cloned()));
    Json(json!({
        "homeworks": [{"homework_name": "proj1", "status": "approved"}],
        "current_date": 1700000000
    }))
}

async fn send_message(State(seen): State<Seen>, Json(body): Json<Value>) -> Json<Value> {
    seen.messages.lock().unwrap().push(body);
    Json(json!({"ok": true, "result": {"message_id": 1}}))
}

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn fetcher_sends_token_and_cursor() {
    let seen = Seen::default();
    let app = Router::new()
        .route("/api/statuses/", get(statuses))
        .with_state(seen.clone());
    let addr = serve(app).await;

    let fetcher = HttpStatusFetcher::new(
        &format!("http://{addr}/api/statuses/"),
        "practicum-secret".into(),
        TIMEOUT,
    )
    .unwrap();
    let body = fetcher.fetch(1_699_000_000).await.unwrap();

    assert_eq!(body["current_date"], 1700000000);
    let requests = seen.requests.lock().unwrap();
    assert_eq!(
        *requests,
        vec![(
            Some("OAuth practicum-secret".to_string()),
            Some("1699000000".to_string())
        )]
    );
}

#[tokio::test]
async fn fetcher_rejects_non_200() {
    let app = Router::new().route(
        "/api/statuses/",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
    );
    let addr = serve(app).await;
    let endpoint = format!("http://{addr}/api/statuses/");

    let fetcher = HttpStatusFetcher::new(&endpoint, "t".into(), TIMEOUT).unwrap();
    let err = fetcher.fetch(0).await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(
        err.to_string(),
        format!("Эндпоинт {endpoint} недоступен. Код ответа API: 503")
    );
}

#[tokio::test]
async fn fetcher_rejects_non_json_body() {
    let app = Router::new().route("/api/statuses/", get(|| async { "<html>oops</html>" }));
    let addr = serve(app).await;

    let fetcher =
        HttpStatusFetcher::new(&format!("http://{addr}/api/statuses/"), "t".into(), TIMEOUT)
            .unwrap();
    let err = fetcher.fetch(0).await.unwrap_err();

    assert!(matches!(err, FetchError::Decode { .. }), "{err:?}");
}

#[tokio::test]
async fn fetcher_reports_unreachable_endpoint() {
    // Bind then drop to get a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let fetcher =
        HttpStatusFetcher::new(&format!("http://{addr}/api/statuses/"), "t".into(), TIMEOUT)
            .unwrap();
    let err = fetcher.fetch(0).await.unwrap_err();

    assert!(matches!(err, FetchError::Transport { .. }), "{err:?}");
}

#[tokio::test]
async fn notifier_posts_chat_and_text() {
    let seen = Seen::default();
    let app = Router::new()
        .route("/botbot-secret/sendMessage", post(send_message))
        .with_state(seen.clone());
    let addr = serve(app).await;

    let notifier =
        TelegramNotifier::new(&format!("http://{addr}/"), "bot-secret", "42".into(), TIMEOUT)
            .unwrap();
    notifier.send("привет").await.unwrap();

    assert_eq!(
        *seen.messages.lock().unwrap(),
        vec![json!({"chat_id": "42", "text": "привет"})]
    );
}

#[tokio::test]
async fn notifier_surfaces_api_rejection() {
    let app = Router::new().route(
        "/botbot-secret/sendMessage",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"ok": false, "error_code": 400, "description": "Bad Request: chat not found"})),
            )
        }),
    );
    let addr = serve(app).await;

    let notifier =
        TelegramNotifier::new(&format!("http://{addr}"), "bot-secret", "42".into(), TIMEOUT)
            .unwrap();
    let err = notifier.send("hi").await.unwrap_err();

    match err {
        NotifyError::Rejected {
            status,
            description,
        } => {
            assert_eq!(status, 400);
            assert_eq!(description, "Bad Request: chat not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn notifier_keeps_status_of_non_json_reply() {
    let app = Router::new().route(
        "/botbot-secret/sendMessage",
        post(|| async {
            (
                StatusCode::BAD_GATEWAY,
                "<html><body><h1>502 Bad Gateway</h1></body></html>",
            )
        }),
    );
    let addr = serve(app).await;

    let notifier =
        TelegramNotifier::new(&format!("http://{addr}"), "bot-secret", "42".into(), TIMEOUT)
            .unwrap();
    let err = notifier.send("hi").await.unwrap_err();

    match err {
        NotifyError::Rejected {
            status,
            description,
        } => {
            assert_eq!(status, 502);
            assert!(description.contains("502 Bad Gateway"), "{description}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

async fn stall() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(30)).await;
    Json(json!({"ok": true}))
}

#[tokio::test]
async fn fetcher_times_out_on_stalled_server() {
    let app = Router::new().route("/api/statuses/", get(stall));
    let addr = serve(app).await;

    let fetcher = HttpStatusFetcher::new(
        &format!("http://{addr}/api/statuses/"),
        "t".into(),
        Duration::from_millis(200),
    )
    .unwrap();
    let started = std::time::Instant::now();
    let err = fetcher.fetch(0).await.unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(10));
    match err {
        FetchError::Transport { source, .. } => assert!(source.is_timeout(), "{source:?}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn notifier_times_out_on_stalled_server() {
    let app = Router::new().route("/botbot-secret/sendMessage", post(stall));
    let addr = serve(app).await;

    let notifier = TelegramNotifier::new(
        &format!("http://{addr}"),
        "bot-secret",
        "42".into(),
        Duration::from_millis(200),
    )
    .unwrap();
    let started = std::time::Instant::now();
    let err = notifier.send("hi").await.unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(10));
    match err {
        NotifyError::Transport(source) => assert!(source.is_timeout(), "{source:?}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn full_cycle_over_http() {
    let seen = Seen::default();
    let app = Router::new()
        .route("/api/statuses/", get(statuses))
        .route("/bottg/sendMessage", post(send_message))
        .with_state(seen.clone());
    let addr = serve(app).await;

    let fetcher =
        HttpStatusFetcher::new(&format!("http://{addr}/api/statuses/"), "p".into(), TIMEOUT)
            .unwrap();
    let notifier = TelegramNotifier::new(&format!("http://{addr}"), "tg", "7".into(), TIMEOUT)
        .unwrap();
    let mut state = LoopState::starting_at(1_699_999_000);

    let outcome = run_cycle(&mut state, &fetcher, &notifier).await;

    let expected = "Изменился статус проверки работы \"proj1\". Работа проверена: ревьюеру всё понравилось. Ура!";
    assert_eq!(
        outcome,
        CycleOutcome::Notified {
            message: expected.into()
        }
    );
    assert_eq!(state.cursor, 1_700_000_000);
    assert_eq!(
        seen.messages.lock().unwrap()[0],
        json!({"chat_id": "7", "text": expected})
    );
}
