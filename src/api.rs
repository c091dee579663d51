use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use tower_http::cors::CorsLayer;

use crate::advisor::{health_solution, HealthSolution};
use crate::chat::{ChatEngine, ChatReply, ReplySource, SymptomAssessment};
use crate::config::AssistantConfig;
use crate::dataset::records::Urgency;
use crate::dataset::{self, DatasetHandle, DatasetStats};
use crate::history::{ExchangeEntry, ExchangeHistory, ExchangeKind};
use crate::predictor::{
    personalized_recommendations, PredictionReport, Predictor, RecommendationSets,
    DEFAULT_PROFILES_PATH,
};
use crate::suggest;
use crate::triage::{EmergencyLexicon, CHECKER_EMERGENCY_MESSAGE};

#[derive(Clone)]
pub struct AppState {
    config: Arc<AssistantConfig>,
    dataset: DatasetHandle,
    chat: Arc<ChatEngine>,
    predictor: Arc<Predictor>,
    history: Arc<ExchangeHistory>,
    lexicon: Arc<EmergencyLexicon>,
}

impl AppState {
    /// Wire the application state around an already-created dataset
    /// handle, so the caller keeps it for loading and hot reload.
    pub fn new(config: AssistantConfig, dataset: DatasetHandle) -> Self {
        let lexicon = Arc::new(config.lexicon());
        let chat = Arc::new(ChatEngine::new(dataset.clone(), lexicon.clone()));
        let predictor = Arc::new(Predictor::load_from_file(DEFAULT_PROFILES_PATH));
        let history = Arc::new(ExchangeHistory::with_capacity(config.history.capacity));
        Self {
            config: Arc::new(config),
            dataset,
            chat,
            predictor,
            history,
            lexicon,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/chat", post(chat))
        .route("/predict", post(predict))
        .route("/solution", post(solution))
        .route("/symptoms/assess", post(assess_symptoms))
        .route("/symptoms/suggest", get(suggest_symptoms))
        .route("/recommendations", get(recommendations))
        .route("/dataset/stats", get(dataset_stats))
        .route("/admin/reload-dataset", get(admin_reload_dataset))
        .route("/debug/history", get(debug_history))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct ChatReq {
    message: String,
}

async fn chat(State(state): State<AppState>, Json(body): Json<ChatReq>) -> Json<ChatReply> {
    let reply = state.chat.respond(&body.message);

    counter!("chat_requests_total", "source" => reply.source.as_str()).increment(1);
    if reply.source == ReplySource::Emergency {
        counter!("chat_emergency_total").increment(1);
    }
    state.history.record(
        ExchangeKind::Chat,
        reply.urgency,
        reply.source.as_str(),
        &body.message,
    );

    Json(reply)
}

#[derive(serde::Deserialize)]
struct PredictReq {
    symptoms: String,
    /// Accepted for client compatibility; replies are English only.
    #[serde(default)]
    language: Option<String>,
}

#[derive(serde::Serialize)]
struct PredictResp {
    emergency: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prediction: Option<PredictionReport>,
}

async fn predict(State(state): State<AppState>, Json(body): Json<PredictReq>) -> Json<PredictResp> {
    let _ = body.language;

    if state.lexicon.checker_emergency(&body.symptoms).is_some() {
        counter!("predict_emergency_total").increment(1);
        state.history.record(
            ExchangeKind::Predict,
            Urgency::High,
            "emergency",
            &body.symptoms,
        );
        return Json(PredictResp {
            emergency: true,
            message: Some(CHECKER_EMERGENCY_MESSAGE.to_string()),
            prediction: None,
        });
    }

    let prediction = state.predictor.predict(&body.symptoms);
    counter!("predict_requests_total").increment(1);

    let label = prediction
        .as_ref()
        .map(|p| p.disease.clone())
        .unwrap_or_else(|| "none".to_string());
    state
        .history
        .record(ExchangeKind::Predict, Urgency::Low, &label, &body.symptoms);

    Json(PredictResp {
        emergency: false,
        message: None,
        prediction,
    })
}

#[derive(serde::Deserialize)]
struct SolutionReq {
    message: String,
}

async fn solution(
    State(state): State<AppState>,
    Json(body): Json<SolutionReq>,
) -> Json<Option<HealthSolution>> {
    let matches = state.dataset.matches(&body.message);
    let solution = matches.as_ref().and_then(health_solution);

    match &solution {
        Some(s) => state
            .history
            .record(ExchangeKind::Solution, s.urgency, "solution", &body.message),
        None => state
            .history
            .record(ExchangeKind::Solution, Urgency::Low, "none", &body.message),
    }

    Json(solution)
}

async fn assess_symptoms(
    State(state): State<AppState>,
    Json(names): Json<Vec<String>>,
) -> Json<SymptomAssessment> {
    Json(state.chat.assess_symptoms(&names))
}

async fn suggest_symptoms(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> Json<Vec<String>> {
    let query = q.get("q").cloned().unwrap_or_default();
    let limit = q
        .get("limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(state.config.suggest.max);
    Json(suggest::suggest(
        &query,
        &state.dataset,
        state.config.suggest.threshold,
        limit,
    ))
}

async fn recommendations() -> Json<RecommendationSets> {
    Json(personalized_recommendations())
}

async fn dataset_stats(State(state): State<AppState>) -> Json<DatasetStats> {
    Json(state.dataset.stats())
}

async fn admin_reload_dataset(State(state): State<AppState>) -> String {
    match dataset::reload_from_file(&state.dataset, &dataset::dataset_path()) {
        Ok(_) => "reloaded".to_string(),
        Err(err) => format!("failed: {:#}", err),
    }
}

async fn debug_history(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> Json<Vec<ExchangeEntry>> {
    let n = q.get("n").and_then(|v| v.parse().ok()).unwrap_or(10);
    Json(state.history.snapshot_last_n(n))
}
