// src/dataset/mod.rs
//! In-memory health dataset: loose JSON ingestion, substring matching,
//! and a thread-safe handle with dev-only hot reload.

pub mod records;
pub mod source;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::Value;

use self::records::{
    DietRecord, DiseaseRecord, PrecautionRecord, SymptomRecord, Urgency, WorkoutRecord,
};
use self::source::DatasetSource;

// --- env defaults & names ---
pub const DEFAULT_DATASET_PATH: &str = "config/health_dataset.json";
pub const ENV_DATASET_PATH: &str = "HEALTH_DATASET_PATH";
pub const ENV_HOT_RELOAD: &str = "HEALTH_HOT_RELOAD";

/// Dataset file path: `HEALTH_DATASET_PATH` or the default next to the binary.
pub fn dataset_path() -> PathBuf {
    std::env::var(ENV_DATASET_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATASET_PATH))
}

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("dataset_load_total", "Completed dataset load operations.");
        describe_counter!(
            "dataset_load_errors_total",
            "Dataset loads that failed to fetch, parse, or apply."
        );
        describe_gauge!(
            "dataset_records",
            "Records per dataset section after the last load."
        );
        describe_gauge!(
            "dataset_last_load_ts",
            "Unix ts of the last successful dataset load."
        );
    });
}

/// Normalize ingested text: decode HTML entities, strip tags and curly
/// quotes, collapse whitespace. Sentence punctuation is kept because the
/// fields are rendered back to the user verbatim.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out = out.trim().to_string();

    // 5) Length cap: 1500 chars
    if out.chars().count() > 1500 {
        out = out.chars().take(1500).collect();
    }

    out
}

/// True when `haystack_lower` contains the lowered `key`.
/// Blank keys never match (records with missing names would otherwise
/// match every input).
fn contains_key(haystack_lower: &str, key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && haystack_lower.contains(&key.to_lowercase())
}

/// All five record sections. Read-only between loads; the handle swaps a
/// rebuilt store wholesale under its write lock.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    pub symptoms: Vec<SymptomRecord>,
    pub diseases: Vec<DiseaseRecord>,
    pub precautions: Vec<PrecautionRecord>,
    pub workouts: Vec<WorkoutRecord>,
    pub diets: Vec<DietRecord>,
}

/// Owned clones of every record matching one input, ready for composition.
#[derive(Debug, Clone, Default)]
pub struct MatchSet {
    pub symptoms: Vec<SymptomRecord>,
    pub diseases: Vec<DiseaseRecord>,
    pub precautions: Vec<PrecautionRecord>,
    pub workouts: Vec<WorkoutRecord>,
    pub diets: Vec<DietRecord>,
}

impl MatchSet {
    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
            && self.diseases.is_empty()
            && self.precautions.is_empty()
            && self.workouts.is_empty()
            && self.diets.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub loaded: bool,
    pub total_symptoms: usize,
    pub total_diseases: usize,
    pub total_precautions: usize,
    pub total_workouts: usize,
    pub total_diets: usize,
    pub high_urgency_symptoms: usize,
    pub emergency_symptoms: usize,
}

impl DatasetStore {
    /// Replace the sections present in `doc` (top-level keys, any casing).
    /// Unknown keys are ignored. Returns `(section, record_count)` per
    /// section applied; an empty result means the document carried none.
    pub fn apply_document(&mut self, doc: &Value) -> Vec<(&'static str, usize)> {
        let mut applied = Vec::new();
        let Some(obj) = doc.as_object() else {
            return applied;
        };
        for (key, value) in obj {
            let Some(rows) = value.as_array() else {
                continue;
            };
            match key.to_ascii_lowercase().as_str() {
                "symptoms" => {
                    self.symptoms = rows.iter().map(SymptomRecord::from_value).collect();
                    applied.push(("symptoms", self.symptoms.len()));
                }
                "diseases" => {
                    self.diseases = rows.iter().map(DiseaseRecord::from_value).collect();
                    applied.push(("diseases", self.diseases.len()));
                }
                "precautions" => {
                    self.precautions = rows.iter().map(PrecautionRecord::from_value).collect();
                    applied.push(("precautions", self.precautions.len()));
                }
                "workouts" => {
                    self.workouts = rows.iter().map(WorkoutRecord::from_value).collect();
                    applied.push(("workouts", self.workouts.len()));
                }
                "diets" => {
                    self.diets = rows.iter().map(DietRecord::from_value).collect();
                    applied.push(("diets", self.diets.len()));
                }
                _ => {}
            }
        }
        applied
    }

    /// Symptoms whose name or any condition appears in the input, or whose
    /// description contains the whole input (short inputs like "headache"
    /// hit that direction).
    pub fn matching_symptoms(&self, input: &str) -> Vec<&SymptomRecord> {
        let lower = input.trim().to_lowercase();
        if lower.is_empty() {
            return Vec::new();
        }
        self.symptoms
            .iter()
            .filter(|s| {
                contains_key(&lower, &s.name)
                    || (!s.description.trim().is_empty()
                        && s.description.to_lowercase().contains(&lower))
                    || s.conditions.iter().any(|c| contains_key(&lower, c))
            })
            .collect()
    }

    /// Diseases any of whose listed symptoms overlaps one of the inputs,
    /// in either containment direction.
    pub fn matching_diseases(&self, inputs: &[&str]) -> Vec<&DiseaseRecord> {
        let lowered: Vec<String> = inputs
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if lowered.is_empty() {
            return Vec::new();
        }
        self.diseases
            .iter()
            .filter(|d| {
                d.symptoms.iter().any(|ds| {
                    let ds = ds.trim().to_lowercase();
                    !ds.is_empty()
                        && lowered
                            .iter()
                            .any(|input| ds.contains(input.as_str()) || input.contains(ds.as_str()))
                })
            })
            .collect()
    }

    pub fn matching_precautions(&self, input: &str) -> Vec<&PrecautionRecord> {
        let lower = input.trim().to_lowercase();
        if lower.is_empty() {
            return Vec::new();
        }
        self.precautions
            .iter()
            .filter(|p| {
                contains_key(&lower, &p.condition)
                    || p.precautions.iter().any(|item| contains_key(&lower, item))
            })
            .collect()
    }

    pub fn matching_workouts(&self, input: &str) -> Vec<&WorkoutRecord> {
        let lower = input.trim().to_lowercase();
        if lower.is_empty() {
            return Vec::new();
        }
        self.workouts
            .iter()
            .filter(|w| {
                contains_key(&lower, &w.condition)
                    || w.exercises.iter().any(|item| contains_key(&lower, item))
            })
            .collect()
    }

    pub fn matching_diets(&self, input: &str) -> Vec<&DietRecord> {
        let lower = input.trim().to_lowercase();
        if lower.is_empty() {
            return Vec::new();
        }
        self.diets
            .iter()
            .filter(|d| {
                contains_key(&lower, &d.condition)
                    || d.foods.iter().any(|item| contains_key(&lower, item))
            })
            .collect()
    }

    /// Run every matcher against one input and clone the hits out.
    pub fn matches(&self, input: &str) -> MatchSet {
        MatchSet {
            symptoms: self.matching_symptoms(input).into_iter().cloned().collect(),
            diseases: self
                .matching_diseases(&[input])
                .into_iter()
                .cloned()
                .collect(),
            precautions: self
                .matching_precautions(input)
                .into_iter()
                .cloned()
                .collect(),
            workouts: self.matching_workouts(input).into_iter().cloned().collect(),
            diets: self.matching_diets(input).into_iter().cloned().collect(),
        }
    }

    pub fn statistics(&self, loaded: bool) -> DatasetStats {
        DatasetStats {
            loaded,
            total_symptoms: self.symptoms.len(),
            total_diseases: self.diseases.len(),
            total_precautions: self.precautions.len(),
            total_workouts: self.workouts.len(),
            total_diets: self.diets.len(),
            high_urgency_symptoms: self
                .symptoms
                .iter()
                .filter(|s| s.urgency == Urgency::High)
                .count(),
            emergency_symptoms: self
                .symptoms
                .iter()
                .filter(|s| !s.emergency_indicators.is_empty())
                .count(),
        }
    }
}

/* ----------------------------
Thread-safe handle + hot reload
---------------------------- */

/// Shared handle over the store. Cloning is cheap; readers never block
/// each other, and loads rebuild a store off-lock before swapping it in.
#[derive(Clone)]
pub struct DatasetHandle {
    inner: Arc<RwLock<DatasetStore>>,
    loaded: Arc<AtomicBool>,
}

impl Default for DatasetHandle {
    fn default() -> Self {
        Self::empty()
    }
}

impl DatasetHandle {
    pub fn new(store: DatasetStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
            loaded: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle over an empty store; the service runs on built-in knowledge
    /// until a dataset loads.
    pub fn empty() -> Self {
        Self::new(DatasetStore::default())
    }

    /// True once at least one dataset section has been applied.
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Relaxed)
    }

    /// None when the lock is poisoned; callers degrade to fallback content.
    pub fn matches(&self, input: &str) -> Option<MatchSet> {
        self.inner.read().ok().map(|store| store.matches(input))
    }

    pub fn stats(&self) -> DatasetStats {
        match self.inner.read() {
            Ok(store) => store.statistics(self.is_loaded()),
            Err(_) => DatasetStats::default(),
        }
    }

    /// Symptom names for suggestion lookups (blank names dropped).
    pub fn symptom_names(&self) -> Vec<String> {
        match self.inner.read() {
            Ok(store) => store
                .symptoms
                .iter()
                .map(|s| s.name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Apply a (possibly partial) document: clone the current store,
    /// replace the sections present, swap under the write lock.
    pub fn apply_document(&self, doc: &Value) -> Vec<(&'static str, usize)> {
        let mut next = match self.inner.read() {
            Ok(store) => store.clone(),
            Err(_) => return Vec::new(),
        };
        let applied = next.apply_document(doc);
        if applied.is_empty() {
            return applied;
        }
        if let Ok(mut guard) = self.inner.write() {
            *guard = next;
            self.loaded.store(true, Ordering::Relaxed);
        }
        applied
    }
}

fn apply_and_report(handle: &DatasetHandle, doc: &Value, origin: &str) -> Result<DatasetStats> {
    ensure_metrics_described();
    let applied = handle.apply_document(doc);
    if applied.is_empty() {
        counter!("dataset_load_errors_total").increment(1);
        anyhow::bail!("dataset document from {origin} contained no known sections");
    }
    for (section, count) in &applied {
        tracing::info!(origin, section, count, "dataset section loaded");
        gauge!("dataset_records", "section" => *section).set(*count as f64);
    }
    counter!("dataset_load_total").increment(1);
    gauge!("dataset_last_load_ts").set(chrono::Utc::now().timestamp().max(0) as f64);
    Ok(handle.stats())
}

/// Fetch a dataset document from `source` and apply it.
pub async fn load_from_source(
    handle: &DatasetHandle,
    source: &dyn DatasetSource,
) -> Result<DatasetStats> {
    ensure_metrics_described();
    let doc = match source.fetch().await {
        Ok(doc) => doc,
        Err(e) => {
            counter!("dataset_load_errors_total").increment(1);
            return Err(e.context(format!("fetch dataset from {}", source.name())));
        }
    };
    apply_and_report(handle, &doc, &source.name())
}

/// Synchronous file reload, used by the admin endpoint and hot reload.
pub fn reload_from_file(handle: &DatasetHandle, path: &Path) -> Result<DatasetStats> {
    ensure_metrics_described();
    let parsed = fs::read_to_string(path)
        .with_context(|| format!("read dataset at {}", path.display()))
        .and_then(|raw| {
            serde_json::from_str::<Value>(&raw)
                .with_context(|| format!("parse dataset at {}", path.display()))
        });
    let doc = match parsed {
        Ok(doc) => doc,
        Err(e) => {
            counter!("dataset_load_errors_total").increment(1);
            return Err(e);
        }
    };
    apply_and_report(handle, &doc, &path.display().to_string())
}

/// Returns true if we should enable hot reload (dev/local only).
fn hot_reload_enabled() -> bool {
    let want = std::env::var(ENV_HOT_RELOAD)
        .ok()
        .map(|v| v == "1")
        .unwrap_or(false);
    if !want {
        return false;
    }
    crate::config::app_env_is_dev()
}

/// Start a simple polling watcher on `path` that reloads the dataset into
/// `handle`. Polls mtime every 2s. Uses only std, no external deps.
pub fn start_hot_reload_thread(handle: DatasetHandle, path: PathBuf) {
    if !hot_reload_enabled() {
        return;
    }

    thread::spawn(move || {
        let poll = Duration::from_secs(2);
        let mut last_mtime: Option<SystemTime> = None;

        loop {
            match fs::metadata(&path).and_then(|m| m.modified()) {
                Ok(mtime) => {
                    let changed = match last_mtime {
                        None => {
                            last_mtime = Some(mtime);
                            false
                        }
                        Some(prev) => mtime > prev,
                    };
                    if changed {
                        match reload_from_file(&handle, &path) {
                            Ok(stats) => tracing::info!(
                                path = %path.display(),
                                symptoms = stats.total_symptoms,
                                diseases = stats.total_diseases,
                                "dataset hot-reloaded"
                            ),
                            Err(e) => tracing::warn!(
                                error = ?e,
                                path = %path.display(),
                                "dataset hot-reload failed"
                            ),
                        }
                        last_mtime = Some(mtime);
                    }
                }
                Err(_) => {
                    // File missing or unreadable; keep trying.
                }
            }
            thread::sleep(poll);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_store() -> DatasetStore {
        let mut store = DatasetStore::default();
        store.apply_document(&json!({
            "symptoms": [
                {
                    "symptom": "headache",
                    "description": "Pain anywhere in the head.",
                    "urgency": "low",
                    "conditions": ["tension", "migraine"],
                    "recommendations": ["Rest in a quiet room"],
                    "precautions": ["Limit screen time"],
                },
                {
                    "symptom": "chest pain",
                    "description": "Pressure or tightness in the chest.",
                    "urgency": "high",
                    "conditions": ["heart attack", "angina"],
                    "recommendations": ["Call emergency services"],
                    "emergency_indicators": ["radiating arm pain"],
                },
            ],
            "diseases": [
                {
                    "disease": "Influenza",
                    "description": "A viral respiratory infection.",
                    "symptoms": ["fever", "body aches"],
                    "treatments": ["rest", "fluids"],
                },
            ],
            "precautions": [
                { "condition": "migraine", "precautions": ["Avoid bright light"] },
            ],
            "workouts": [
                { "condition": "back pain", "exercises": ["stretching", "walking"] },
            ],
            "diets": [
                { "condition": "anemia", "foods": ["spinach", "lentils"] },
            ],
        }));
        store
    }

    #[test]
    fn symptom_matches_by_name_and_condition() {
        let store = sample_store();
        let by_name = store.matching_symptoms("I have a headache since morning");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "headache");

        let by_condition = store.matching_symptoms("could this be a migraine?");
        assert!(by_condition.iter().any(|s| s.name == "headache"));
    }

    #[test]
    fn short_input_matches_description_containment() {
        let store = sample_store();
        // "chest" is contained in the chest pain description.
        let hits = store.matching_symptoms("chest");
        assert!(hits.iter().any(|s| s.name == "chest pain"));
    }

    #[test]
    fn disease_matching_is_bidirectional() {
        let store = sample_store();
        // Input contains the listed symptom.
        assert_eq!(store.matching_diseases(&["high fever and chills"]).len(), 1);
        // Listed symptom contains the input.
        assert_eq!(store.matching_diseases(&["fever"]).len(), 1);
        assert!(store.matching_diseases(&["rash"]).is_empty());
    }

    #[test]
    fn blank_input_and_blank_keys_never_match() {
        let mut store = sample_store();
        assert!(store.matching_symptoms("   ").is_empty());
        assert!(store.matching_diseases(&[""]).is_empty());

        // A record with no name must not match every input.
        store.apply_document(&json!({
            "workouts": [{ "exercises": ["walking"] }],
        }));
        assert!(store.matching_workouts("I feel dizzy").is_empty());
        assert_eq!(store.matching_workouts("daily walking helps").len(), 1);
    }

    #[test]
    fn partial_document_replaces_only_present_sections() {
        let mut store = sample_store();
        let applied = store.apply_document(&json!({
            "diets": [
                { "condition": "diabetes", "foods": ["oats"] },
                { "condition": "obesity", "foods": ["salads"] },
            ],
        }));
        assert_eq!(applied, vec![("diets", 2)]);
        assert_eq!(store.diets.len(), 2);
        assert_eq!(store.symptoms.len(), 2); // untouched
    }

    #[test]
    fn statistics_count_urgent_and_emergency_symptoms() {
        let stats = sample_store().statistics(true);
        assert!(stats.loaded);
        assert_eq!(stats.total_symptoms, 2);
        assert_eq!(stats.high_urgency_symptoms, 1);
        assert_eq!(stats.emergency_symptoms, 1);
    }

    #[test]
    fn handle_apply_sets_loaded_and_serves_matches() {
        let handle = DatasetHandle::empty();
        assert!(!handle.is_loaded());
        assert_eq!(handle.stats().total_symptoms, 0);

        let applied = handle.apply_document(&json!({
            "symptoms": [{ "symptom": "cough", "description": "A dry cough." }],
        }));
        assert_eq!(applied, vec![("symptoms", 1)]);
        assert!(handle.is_loaded());

        let m = handle.matches("a nagging cough at night").unwrap();
        assert_eq!(m.symptoms.len(), 1);
        assert_eq!(handle.symptom_names(), vec!["cough"]);
    }

    #[test]
    fn document_without_known_sections_applies_nothing() {
        let handle = DatasetHandle::empty();
        let applied = handle.apply_document(&json!({ "metadata": { "version": 3 } }));
        assert!(applied.is_empty());
        assert!(!handle.is_loaded());
    }

    #[test]
    fn normalize_text_strips_markup_and_collapses_ws() {
        let s = "  <b>Fever</b>&nbsp; and\n\n “chills”  ";
        assert_eq!(normalize_text(s), "Fever and \"chills\"");
    }
}
