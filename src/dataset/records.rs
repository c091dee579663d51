// src/dataset/records.rs
//! Typed records for the five dataset sections, built from loose JSON.
//!
//! Upstream health datasets disagree on key casing (`symptom` vs
//! `Symptom`), key names (`workouts` vs `recommended_workouts`) and list
//! encodings (JSON arrays vs `"a, b; c"` strings). Every accessor here
//! tolerates all of those and falls back to an empty value instead of
//! failing the load.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dataset::normalize_text;

/// Displayed severity of a symptom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Severity {
    #[default]
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    /// Tolerant parse: `"Very severe"`, `"HIGH"` and `"medium"` all map.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("severe") || lower.contains("high") {
            Self::Severe
        } else if lower.contains("moderate") || lower.contains("medium") {
            Self::Moderate
        } else {
            Self::Mild
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }
}

/// How quickly a matched record should push the user toward care.
/// Variants are ordered so `max()` picks the most urgent level.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[default]
    Low,
    Moderate,
    High,
}

impl Urgency {
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("high") || lower.contains("urgent") || lower.contains("emergency") {
            Self::High
        } else if lower.contains("moderate") || lower.contains("medium") {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Severity wordings ("severe") also show up in urgency columns.
    pub fn from_severity_words(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("severe") || lower.contains("high") {
            Self::High
        } else if lower.contains("moderate") || lower.contains("medium") {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Intensity {
    Low,
    #[default]
    Moderate,
    High,
}

impl Intensity {
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("high") || lower.contains("intense") || lower.contains("vigorous") {
            Self::High
        } else if lower.contains("moderate") || lower.contains("medium") {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrecautionCategory {
    #[default]
    General,
    Emergency,
    Lifestyle,
}

impl PrecautionCategory {
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("emergency") || lower.contains("urgent") {
            Self::Emergency
        } else if lower.contains("lifestyle") || lower.contains("daily") {
            Self::Lifestyle
        } else {
            Self::General
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WorkoutCategory {
    #[default]
    Cardio,
    Strength,
    Flexibility,
    Recovery,
}

impl WorkoutCategory {
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("strength") || lower.contains("weight") || lower.contains("resistance") {
            Self::Strength
        } else if lower.contains("flexibility")
            || lower.contains("stretch")
            || lower.contains("yoga")
        {
            Self::Flexibility
        } else if lower.contains("recovery")
            || lower.contains("rest")
            || lower.contains("rehabilitation")
        {
            Self::Recovery
        } else {
            Self::Cardio
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DietCategory {
    #[default]
    Nutrition,
    Therapeutic,
    Preventive,
}

impl DietCategory {
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("therapeutic") || lower.contains("treatment") || lower.contains("medical")
        {
            Self::Therapeutic
        } else if lower.contains("preventive")
            || lower.contains("prevention")
            || lower.contains("wellness")
        {
            Self::Preventive
        } else {
            Self::Nutrition
        }
    }
}

/// One symptom row: free text plus the lists the advisor composes from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymptomRecord {
    pub name: String,
    pub description: String,
    pub severity: Severity,
    pub urgency: Urgency,
    pub conditions: Vec<String>,
    pub recommendations: Vec<String>,
    pub emergency_indicators: Vec<String>,
    pub precautions: Vec<String>,
    pub workouts: Vec<String>,
    pub diets: Vec<String>,
}

impl SymptomRecord {
    pub fn from_value(v: &Value) -> Self {
        Self {
            name: text(v, &["symptom"]),
            description: text(v, &["description"]),
            severity: Severity::parse(&text(v, &["severity"])),
            urgency: Urgency::parse(&text(v, &["urgency"])),
            conditions: list(v, &["conditions"]),
            recommendations: list(v, &["recommendations"]),
            emergency_indicators: list(v, &["emergency_indicators", "emergencyindicators"]),
            precautions: list(v, &["precautions"]),
            workouts: list(v, &["workouts"]),
            diets: list(v, &["diets"]),
        }
    }
}

/// One disease/condition row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiseaseRecord {
    pub name: String,
    pub description: String,
    pub symptoms: Vec<String>,
    pub causes: Vec<String>,
    pub treatments: Vec<String>,
    pub prevention: Vec<String>,
    pub urgency: Urgency,
    pub precautions: Vec<String>,
    pub workouts: Vec<String>,
    pub diets: Vec<String>,
}

impl DiseaseRecord {
    pub fn from_value(v: &Value) -> Self {
        Self {
            name: text(v, &["disease", "name"]),
            description: text(v, &["description"]),
            symptoms: list(v, &["symptoms"]),
            causes: list(v, &["causes"]),
            treatments: list(v, &["treatments"]),
            prevention: list(v, &["prevention"]),
            urgency: Urgency::parse(&text(v, &["urgency"])),
            precautions: list(v, &["precautions"]),
            workouts: list(v, &["workouts", "recommended_workouts"]),
            diets: list(v, &["diets", "dietary_recommendations"]),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrecautionRecord {
    pub condition: String,
    pub precautions: Vec<String>,
    pub severity: Urgency,
    pub category: PrecautionCategory,
}

impl PrecautionRecord {
    pub fn from_value(v: &Value) -> Self {
        Self {
            condition: text(v, &["condition"]),
            precautions: list(v, &["precautions"]),
            severity: Urgency::from_severity_words(&text(v, &["severity"])),
            category: PrecautionCategory::parse(&text(v, &["category"])),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutRecord {
    pub condition: String,
    pub exercises: Vec<String>,
    pub duration: String,
    pub frequency: String,
    pub intensity: Intensity,
    pub category: WorkoutCategory,
}

impl WorkoutRecord {
    pub fn from_value(v: &Value) -> Self {
        Self {
            condition: text(v, &["condition"]),
            exercises: list(v, &["exercises"]),
            duration: text_or(v, &["duration"], "30 minutes"),
            frequency: text_or(v, &["frequency"], "3 times per week"),
            intensity: Intensity::parse(&text_or(v, &["intensity"], "moderate")),
            category: WorkoutCategory::parse(&text(v, &["category"])),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DietRecord {
    pub condition: String,
    pub foods: Vec<String>,
    pub avoid_foods: Vec<String>,
    pub instructions: Vec<String>,
    pub category: DietCategory,
}

impl DietRecord {
    pub fn from_value(v: &Value) -> Self {
        Self {
            condition: text(v, &["condition"]),
            foods: list(v, &["foods", "recommended_foods"]),
            avoid_foods: list(v, &["avoid_foods", "avoidfoods", "foods_to_avoid"]),
            instructions: list(v, &["instructions"]),
            category: DietCategory::parse(&text(v, &["category"])),
        }
    }
}

/// First alias (in order) whose value is present and non-blank.
/// Key comparison ignores ASCII case.
fn field<'a>(v: &'a Value, names: &[&str]) -> Option<&'a Value> {
    let obj = v.as_object()?;
    for name in names {
        for (key, val) in obj {
            if !key.eq_ignore_ascii_case(name) {
                continue;
            }
            match val {
                Value::Null => continue,
                Value::String(s) if s.trim().is_empty() => continue,
                _ => return Some(val),
            }
        }
    }
    None
}

fn text(v: &Value, names: &[&str]) -> String {
    match field(v, names) {
        Some(Value::String(s)) => normalize_text(s),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn text_or(v: &Value, names: &[&str], default: &str) -> String {
    let out = text(v, names);
    if out.is_empty() {
        default.to_string()
    } else {
        out
    }
}

/// Lists may be JSON arrays of strings or a single delimited string.
fn list(v: &Value, names: &[&str]) -> Vec<String> {
    match field(v, names) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(normalize_text)
            .filter(|item| !item.is_empty())
            .collect(),
        Some(Value::String(s)) => split_list(s),
        _ => Vec::new(),
    }
}

/// Split on `,`, `;` or `|`, trim, drop empties.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split([',', ';', '|'])
        .map(normalize_text)
        .filter(|part| !part.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn symptom_fields_tolerate_casing_and_string_lists() {
        let v = json!({
            "Symptom": "Headache",
            "Description": "Pain in the head region.",
            "Severity": "Very Severe",
            "Urgency": "URGENT",
            "Conditions": "tension; migraine | dehydration",
            "Recommendations": ["Rest in a quiet room", ""],
        });
        let rec = SymptomRecord::from_value(&v);
        assert_eq!(rec.name, "Headache");
        assert_eq!(rec.severity, Severity::Severe);
        assert_eq!(rec.urgency, Urgency::High);
        assert_eq!(rec.conditions, vec!["tension", "migraine", "dehydration"]);
        assert_eq!(rec.recommendations, vec!["Rest in a quiet room"]);
        assert!(rec.workouts.is_empty());
    }

    #[test]
    fn disease_name_falls_back_through_aliases() {
        let rec = DiseaseRecord::from_value(&json!({ "name": "Influenza" }));
        assert_eq!(rec.name, "Influenza");

        // `disease` outranks `name` even when both are present.
        let rec = DiseaseRecord::from_value(&json!({ "name": "ignored", "Disease": "Migraine" }));
        assert_eq!(rec.name, "Migraine");
    }

    #[test]
    fn blank_values_fall_through_to_later_aliases() {
        let rec = DiseaseRecord::from_value(&json!({
            "disease": "Anemia",
            "workouts": "",
            "recommended_workouts": "yoga, walking",
        }));
        assert_eq!(rec.workouts, vec!["yoga", "walking"]);
    }

    #[test]
    fn workout_defaults_apply() {
        let rec = WorkoutRecord::from_value(&json!({
            "condition": "back pain",
            "exercises": ["stretching"],
        }));
        assert_eq!(rec.duration, "30 minutes");
        assert_eq!(rec.frequency, "3 times per week");
        assert_eq!(rec.intensity, Intensity::Moderate);
        assert_eq!(rec.category, WorkoutCategory::Cardio);
    }

    #[test]
    fn category_words_normalize_by_substring() {
        assert_eq!(
            WorkoutCategory::parse("Strength training"),
            WorkoutCategory::Strength
        );
        assert_eq!(
            WorkoutCategory::parse("morning yoga"),
            WorkoutCategory::Flexibility
        );
        assert_eq!(
            WorkoutCategory::parse("rehabilitation plan"),
            WorkoutCategory::Recovery
        );
        assert_eq!(WorkoutCategory::parse("brisk walks"), WorkoutCategory::Cardio);

        assert_eq!(
            DietCategory::parse("medical nutrition therapy"),
            DietCategory::Therapeutic
        );
        assert_eq!(DietCategory::parse("wellness plan"), DietCategory::Preventive);

        assert_eq!(
            PrecautionCategory::parse("Daily routine"),
            PrecautionCategory::Lifestyle
        );
        assert_eq!(
            PrecautionCategory::parse("URGENT care"),
            PrecautionCategory::Emergency
        );
    }

    #[test]
    fn precaution_severity_reads_severity_words() {
        let rec = PrecautionRecord::from_value(&json!({
            "condition": "dengue",
            "precautions": ["use mosquito nets"],
            "severity": "severe",
        }));
        assert_eq!(rec.severity, Urgency::High);
    }

    #[test]
    fn urgency_orders_low_to_high() {
        assert!(Urgency::High > Urgency::Moderate);
        assert!(Urgency::Moderate > Urgency::Low);
        assert_eq!([Urgency::Low, Urgency::High].iter().max(), Some(&Urgency::High));
    }

    #[test]
    fn non_object_rows_become_empty_records() {
        let rec = SymptomRecord::from_value(&json!("just a string"));
        assert!(rec.name.is_empty());
        assert_eq!(rec.urgency, Urgency::Low);
    }
}
