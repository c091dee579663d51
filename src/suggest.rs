//! Symptom name suggestions for typeahead.
//!
//! Candidates are the fixed catalog plus whatever the loaded dataset
//! knows, deduplicated case-insensitively in that order. A candidate
//! scores 1.0 when it contains the query or the query contains it;
//! otherwise `strsim::normalized_levenshtein` over the lowered pair.
//! Results at or above the threshold come back sorted by score desc,
//! then name asc.

use std::collections::HashSet;

use strsim::normalized_levenshtein;

use crate::dataset::DatasetHandle;

/// Catalog shown before the user types anything.
pub const COMMON_SYMPTOMS: &[&str] = &[
    "Fever",
    "Cough",
    "Headache",
    "Nausea",
    "Dizziness",
    "Chest pain",
    "Shortness of breath",
    "Muscle aches",
    "Joint pain",
    "Rash",
    "Abdominal pain",
    "Vomiting",
    "Diarrhea",
    "Loss of appetite",
    "Insomnia",
    "Anxiety",
    "Depression",
    "Back pain",
];

/// Convenience defaults
pub const DEFAULT_SUGGEST_THRESHOLD: f64 = 0.72;
pub const DEFAULT_SUGGEST_LIMIT: usize = 10;

pub fn suggest(query: &str, dataset: &DatasetHandle, threshold: f64, limit: usize) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for name in COMMON_SYMPTOMS
        .iter()
        .map(|s| s.to_string())
        .chain(dataset.symptom_names())
    {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_lowercase()) {
            candidates.push(trimmed.to_string());
        }
    }

    let q = query.trim().to_lowercase();
    if q.is_empty() {
        candidates.truncate(limit);
        return candidates;
    }

    let mut scored: Vec<(f64, String)> = candidates
        .into_iter()
        .filter_map(|name| {
            let lowered = name.to_lowercase();
            let score = if lowered.contains(&q) || q.contains(&lowered) {
                1.0
            } else {
                normalized_levenshtein(&lowered, &q)
            };
            (score >= threshold).then_some((score, name))
        })
        .collect();

    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.1.cmp(&b.1))
    });

    scored.into_iter().take(limit).map(|(_, name)| name).collect()
}
