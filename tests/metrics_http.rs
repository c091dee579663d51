// tests/metrics_http.rs
//
// /metrics exposition over the real recorder. The Prometheus recorder
// installs once per process, so every test here shares one router.

use axum::body::{self, Body};
use axum::http::Request;
use axum::Router;
use tokio::sync::OnceCell;
use tower::ServiceExt as _;

use health_triage_assistant::api::{self, AppState};
use health_triage_assistant::config::AssistantConfig;
use health_triage_assistant::dataset::DatasetHandle;
use health_triage_assistant::metrics::Metrics;

static ROUTER: OnceCell<Router> = OnceCell::const_new();

async fn app() -> Router {
    ROUTER
        .get_or_init(|| async {
            let metrics = Metrics::init(123);
            api::router(AppState::new(
                AssistantConfig::default(),
                DatasetHandle::empty(),
            ))
            .merge(metrics.router())
        })
        .await
        .clone()
}

async fn post_chat(message: &str) {
    let req = Request::post("/chat")
        .header("content-type", "application/json")
        .body(Body::from(format!(r#"{{"message":"{message}"}}"#)))
        .unwrap();
    let resp = app().await.oneshot(req).await.unwrap();
    assert!(resp.status().is_success());
}

async fn post_predict(symptoms: &str) {
    let req = Request::post("/predict")
        .header("content-type", "application/json")
        .body(Body::from(format!(r#"{{"symptoms":"{symptoms}"}}"#)))
        .unwrap();
    let resp = app().await.oneshot(req).await.unwrap();
    assert!(resp.status().is_success());
}

async fn scrape() -> String {
    let req = Request::get("/metrics").body(Body::empty()).unwrap();
    let resp = app().await.oneshot(req).await.unwrap();
    assert!(resp.status().is_success());
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn assert_series(text: &str, needle: &str) {
    assert!(
        text.contains(needle),
        "metrics exposition missing '{needle}'\n{text}"
    );
}

#[tokio::test]
async fn request_counters_reach_the_exposition() {
    post_chat("hello").await;
    post_predict("stuffy nose since monday").await;

    let text = scrape().await;
    assert_series(&text, "chat_requests_total");
    assert_series(&text, "predict_requests_total");
    // Set at init time from the configured history capacity.
    assert_series(&text, "exchange_history_capacity");
    assert_series(&text, "123");
}

#[tokio::test]
async fn emergency_counters_track_the_gates() {
    post_chat("I think this is a heart attack").await;
    post_predict("vomiting blood since lunch").await;

    let text = scrape().await;
    assert_series(&text, "chat_emergency_total");
    assert_series(&text, "predict_emergency_total");
}
