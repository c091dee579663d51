//! # Built-in symptom knowledge
//!
//! A small curated table of common symptoms the chat engine consults
//! when the loaded dataset has nothing to say about a message.
//!
//! - Each entry carries likely conditions, a free-text severity, a typed
//!   urgency and a single advice line.
//! - Loads from JSON (`config/knowledge.json`); falls back to the
//!   built-in `default_seed()` when the file is missing or malformed.
//! - Table order is meaningful: matches are reported in table order.

use serde::Deserialize;
use std::{fs, path::Path};

use crate::dataset::records::Urgency;

pub const DEFAULT_KNOWLEDGE_PATH: &str = "config/knowledge.json";

/// One symptom entry in the knowledge table.
#[derive(Debug, Clone, Deserialize)]
pub struct SymptomEntry {
    pub symptom: String,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default)]
    pub advice: String,
}

/// The knowledge table, loaded from JSON or seeded.
#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default)]
    pub symptoms: Vec<SymptomEntry>,
}

impl KnowledgeBase {
    /// Load the table from a JSON file.
    /// Falls back to `default_seed()` on error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|_| Self::default_seed()),
            Err(_) => Self::default_seed(),
        }
    }

    /// Entries whose symptom name appears in `message`, in table order.
    /// Blank names never match.
    pub fn find_in_message(&self, message: &str) -> Vec<&SymptomEntry> {
        let lowered = message.to_lowercase();
        self.symptoms
            .iter()
            .filter(|e| {
                let key = e.symptom.trim().to_lowercase();
                !key.is_empty() && lowered.contains(&key)
            })
            .collect()
    }

    /// Entry for an exact symptom name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&SymptomEntry> {
        let wanted = name.trim().to_lowercase();
        self.symptoms
            .iter()
            .find(|e| e.symptom.to_lowercase() == wanted)
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    /// Built-in table of eight common symptoms.
    /// Used as fallback if no config is found.
    pub(crate) fn default_seed() -> Self {
        let mut symptoms = Vec::new();

        for (symptom, conditions, severity, urgency, advice) in [
            (
                "headache",
                ["tension headache", "migraine", "cluster headache", "sinus infection"],
                "mild to moderate",
                Urgency::Low,
                "Rest, hydration, over-the-counter pain relievers. See a doctor if severe or persistent.",
            ),
            (
                "fever",
                ["viral infection", "bacterial infection", "flu", "covid-19"],
                "mild to severe",
                Urgency::Moderate,
                "Monitor temperature, stay hydrated, rest. Seek medical care if temperature exceeds 103°F.",
            ),
            (
                "chest pain",
                ["heart attack", "angina", "muscle strain", "anxiety"],
                "mild to severe",
                Urgency::High,
                "EMERGENCY: Call 911 immediately for chest pain. Do not wait.",
            ),
            (
                "difficulty breathing",
                ["asthma", "pneumonia", "heart failure", "panic attack"],
                "moderate to severe",
                Urgency::High,
                "EMERGENCY: Seek immediate medical attention for breathing difficulties.",
            ),
            (
                "cough",
                ["common cold", "bronchitis", "pneumonia", "allergies"],
                "mild to moderate",
                Urgency::Moderate,
                "Stay hydrated, use honey for soothing. See doctor if persistent or with fever.",
            ),
            (
                "nausea",
                ["food poisoning", "gastroenteritis", "pregnancy", "motion sickness"],
                "mild to moderate",
                Urgency::Low,
                "Rest, clear fluids, avoid solid foods initially. See doctor if severe or persistent.",
            ),
            (
                "fatigue",
                ["viral infection", "anemia", "depression", "thyroid issues"],
                "mild to severe",
                Urgency::Low,
                "Ensure adequate sleep, proper nutrition. Consult doctor if persistent fatigue.",
            ),
            (
                "abdominal pain",
                ["gastritis", "appendicitis", "food poisoning", "ulcer"],
                "mild to severe",
                Urgency::Moderate,
                "Monitor pain location and intensity. Severe abdominal pain requires immediate medical attention.",
            ),
        ] {
            symptoms.push(SymptomEntry {
                symptom: symptom.to_string(),
                conditions: conditions.iter().map(|c| c.to_string()).collect(),
                severity: severity.to_string(),
                urgency,
                advice: advice.to_string(),
            });
        }

        Self { symptoms }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::default_seed()
    }

    #[test]
    fn finds_entries_in_table_order() {
        let hits = kb();
        let hits = hits.find_in_message("woke up with nausea and a pounding headache");
        let names: Vec<&str> = hits.iter().map(|e| e.symptom.as_str()).collect();
        // table order, not message order
        assert_eq!(names, vec!["headache", "nausea"]);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(kb().get("Chest Pain").is_some());
        assert!(kb().get("  FEVER ").is_some());
        assert!(kb().get("gout").is_none());
    }

    #[test]
    fn warning_set_is_exactly_the_high_entries() {
        let kb = kb();
        let high: Vec<&str> = kb
            .symptoms
            .iter()
            .filter(|e| e.urgency == Urgency::High)
            .map(|e| e.symptom.as_str())
            .collect();
        assert_eq!(high, vec!["chest pain", "difficulty breathing"]);
    }

    #[test]
    fn missing_file_falls_back_to_seed() {
        let kb = KnowledgeBase::load_from_file("definitely/not/here.json");
        assert_eq!(kb.len(), 8);
    }

    #[test]
    fn json_override_replaces_table() {
        let kb: KnowledgeBase = serde_json::from_str(
            r#"{"symptoms":[{"symptom":"sore throat","conditions":["pharyngitis"],"severity":"mild","urgency":"low","advice":"Warm fluids."}]}"#,
        )
        .unwrap();
        assert_eq!(kb.len(), 1);
        assert_eq!(kb.get("sore throat").unwrap().urgency, Urgency::Low);
    }
}
