// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod advisor;
pub mod api;
pub mod config;
pub mod dataset;
pub mod history;
pub mod metrics;
pub mod predictor;
pub mod suggest;
pub mod triage;

// Chat pipeline (emergency gate, dataset replies, built-in knowledge, smalltalk rules)
pub mod chat;

// ---- Re-exports for stable public API ----
// Convenient access to the router: `health_triage_assistant::api::router` or `::router`
pub use crate::api::{router, AppState};

// Re-export the core handles for easy use in bins/tests
pub use crate::chat::ChatEngine;
pub use crate::config::AssistantConfig;
pub use crate::dataset::DatasetHandle;
