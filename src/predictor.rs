//! Mock disease prediction.
//!
//! Each profile carries a canned report plus the keywords that select
//! it. Prediction counts how many of a profile's keywords appear in the
//! lowered symptom text and returns the best profile with confidence
//! adjusted by match quality. Ties go to the later profile in table
//! order; zero hits fall back to the first profile unchanged. There is
//! no model behind this, only the keyword tables.
//!
//! Profiles load from `config/disease_profiles.json`; the built-in seed
//! is used when the file is missing, malformed or empty.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

pub const DEFAULT_PROFILES_PATH: &str = "config/disease_profiles.json";

/// Adjusted confidence stays within this band.
const CONFIDENCE_FLOOR: i32 = 60;
const CONFIDENCE_CEIL: i32 = 95;
/// Confidence gained per matched keyword.
const CONFIDENCE_PER_HIT: i32 = 5;

/// One disease profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseProfile {
    pub key: String,
    pub disease: String,
    pub confidence: u8,
    pub description: String,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub side_effects: Vec<String>,
    #[serde(default)]
    pub precautions: Vec<String>,
    #[serde(default)]
    pub diet: Vec<String>,
    #[serde(default)]
    pub exercise: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl DiseaseProfile {
    fn report(&self, confidence: u8) -> PredictionReport {
        PredictionReport {
            disease: self.disease.clone(),
            confidence,
            description: self.description.clone(),
            medications: self.medications.clone(),
            side_effects: self.side_effects.clone(),
            precautions: self.precautions.clone(),
            diet: self.diet.clone(),
            exercise: self.exercise.clone(),
        }
    }
}

/// What the prediction endpoint returns for a non-emergency input.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub disease: String,
    pub confidence: u8,
    pub description: String,
    pub medications: Vec<String>,
    pub side_effects: Vec<String>,
    pub precautions: Vec<String>,
    pub diet: Vec<String>,
    pub exercise: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Predictor {
    #[serde(default)]
    profiles: Vec<DiseaseProfile>,
}

impl Predictor {
    /// Load profiles from a JSON file.
    /// Falls back to `default_seed()` on error or an empty table.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => match serde_json::from_str::<Predictor>(&s) {
                Ok(p) if !p.profiles.is_empty() => p,
                _ => Self::default_seed(),
            },
            Err(_) => Self::default_seed(),
        }
    }

    pub fn profiles(&self) -> &[DiseaseProfile] {
        &self.profiles
    }

    /// Best-scoring profile for the symptom text.
    ///
    /// `None` only when the profile table is empty, which the seed
    /// fallback prevents in practice.
    pub fn predict(&self, symptoms: &str) -> Option<PredictionReport> {
        let lowered = symptoms.to_lowercase();

        let mut best_idx = 0usize;
        let mut best_score = 0usize;
        let mut seen = false;
        for (i, profile) in self.profiles.iter().enumerate() {
            let score = keyword_hits(&profile.keywords, &lowered);
            // `>=` so a tie moves to the later profile.
            if !seen || score >= best_score {
                best_idx = i;
                best_score = score;
                seen = true;
            }
        }
        if !seen {
            return None;
        }

        if best_score == 0 {
            let first = self.profiles.first()?;
            return Some(first.report(first.confidence));
        }

        let best = &self.profiles[best_idx];
        Some(best.report(adjust_confidence(best.confidence, best_score)))
    }

    /// Built-in profile table.
    pub(crate) fn default_seed() -> Self {
        let profiles = vec![
            profile(
                "common_cold",
                "Common Cold",
                85,
                "A viral infection of the upper respiratory tract that commonly affects the nose and throat. Typically caused by rhinoviruses and is highly contagious.",
                &["Acetaminophen (Tylenol)", "Ibuprofen (Advil)", "Decongestants", "Cough suppressants", "Throat lozenges"],
                &["Drowsiness", "Dry mouth", "Stomach upset", "Dizziness", "Headache"],
                &["Get plenty of rest (8-10 hours)", "Stay hydrated with warm fluids", "Avoid close contact with others", "Wash hands frequently", "Use tissues when sneezing"],
                &["Warm fluids (tea, broth)", "Vitamin C rich foods (citrus, berries)", "Honey and ginger tea", "Avoid dairy temporarily", "Chicken soup"],
                &["Light walking only", "Avoid strenuous activities", "Rest until fever subsides", "Gentle breathing exercises", "Avoid gym/public spaces"],
                &["cold", "runny nose", "congestion", "sore throat", "cough", "sneezing", "fever", "body aches"],
            ),
            profile(
                "seasonal_allergies",
                "Seasonal Allergies (Allergic Rhinitis)",
                78,
                "An immune system response to airborne allergens such as pollen, dust mites, or pet dander. Symptoms typically worsen during specific seasons.",
                &["Antihistamines (Claritin, Zyrtec)", "Nasal corticosteroids", "Decongestants", "Eye drops", "Allergy shots (immunotherapy)"],
                &["Drowsiness", "Dry mouth", "Blurred vision", "Headache", "Nosebleeds (nasal sprays)"],
                &["Avoid known allergens", "Keep windows closed during high pollen", "Use air purifiers", "Monitor pollen counts", "Shower after outdoor activities"],
                &["Anti-inflammatory foods", "Local honey", "Quercetin-rich foods (onions, apples)", "Avoid trigger foods", "Reduce dairy during flare-ups"],
                &["Indoor exercises during high pollen", "Swimming in chlorinated pools", "Yoga and stretching", "Avoid outdoor morning runs", "Exercise after rain"],
                &["allergies", "sneezing", "itchy eyes", "watery eyes", "runny nose", "seasonal", "pollen", "hay fever"],
            ),
            profile(
                "tension_headache",
                "Tension Headache",
                72,
                "The most common type of headache, often caused by stress, poor posture, eye strain, or muscle tension in the head and neck area.",
                &["Acetaminophen", "Ibuprofen", "Aspirin", "Topical pain relievers", "Muscle relaxants (if prescribed)"],
                &["Stomach irritation", "Drowsiness", "Rebound headaches", "Allergic reactions", "Liver damage (with overuse)"],
                &["Manage stress levels", "Maintain regular sleep schedule", "Stay hydrated", "Take breaks from screens", "Correct posture"],
                &["Regular balanced meals", "Limit caffeine intake", "Stay well-hydrated", "Avoid alcohol", "Limit processed foods"],
                &["Neck and shoulder stretches", "Gentle yoga", "Regular walking", "Posture exercises", "Relaxation techniques"],
                &["headache", "head pain", "tension", "stress", "tight", "pressure", "band around head"],
            ),
            profile(
                "migraine",
                "Migraine Headache",
                82,
                "A neurological condition characterized by intense, throbbing headaches often accompanied by nausea, sensitivity to light and sound.",
                &["Triptans (Sumatriptan)", "NSAIDs", "Anti-nausea medication", "Preventive medications", "Ergotamines"],
                &["Nausea", "Dizziness", "Drowsiness", "Muscle weakness", "Chest tightness"],
                &["Identify and avoid triggers", "Maintain regular sleep", "Manage stress", "Stay hydrated", "Keep a headache diary"],
                &["Avoid trigger foods (chocolate, aged cheese)", "Regular meal times", "Limit caffeine", "Stay hydrated", "Consider magnesium supplements"],
                &["Gentle aerobic exercise", "Yoga and meditation", "Avoid intense exercise during attacks", "Regular walking", "Relaxation techniques"],
                &["migraine", "severe headache", "throbbing", "pulsing", "nausea", "light sensitivity", "sound sensitivity", "aura"],
            ),
            profile(
                "gastroenteritis",
                "Gastroenteritis (Stomach Flu)",
                80,
                "Inflammation of the stomach and intestines, usually caused by viral or bacterial infection, resulting in nausea, vomiting, and diarrhea.",
                &["Oral rehydration solutions", "Anti-diarrheal medication", "Probiotics", "Electrolyte supplements", "Antiemetics (for nausea)"],
                &["Constipation (anti-diarrheals)", "Drowsiness", "Dry mouth", "Bloating", "Abdominal cramping"],
                &["Stay hydrated", "Rest and avoid solid foods initially", "Practice good hygiene", "Isolate to prevent spread", "Monitor for dehydration"],
                &["Clear fluids initially", "BRAT diet (bananas, rice, applesauce, toast)", "Probiotics", "Avoid dairy temporarily", "Gradual return to normal diet"],
                &["Complete rest initially", "Light walking when feeling better", "Avoid strenuous activity", "Stay near bathroom facilities", "Resume gradually"],
                &["stomach flu", "nausea", "vomiting", "diarrhea", "stomach pain", "abdominal pain", "food poisoning"],
            ),
            profile(
                "anxiety",
                "Anxiety Disorder",
                75,
                "A mental health condition characterized by excessive worry, fear, or nervousness that interferes with daily activities and quality of life.",
                &["SSRIs (Sertraline, Escitalopram)", "Benzodiazepines (short-term)", "Beta-blockers", "Buspirone", "Therapy (CBT)"],
                &["Drowsiness", "Weight changes", "Sexual dysfunction", "Nausea", "Dependency risk (benzodiazepines)"],
                &["Avoid caffeine and alcohol", "Maintain regular sleep", "Practice stress management", "Stay connected with support system", "Monitor mood changes"],
                &["Limit caffeine and sugar", "Omega-3 fatty acids", "Complex carbohydrates", "Magnesium-rich foods", "Avoid excessive alcohol"],
                &["Regular aerobic exercise", "Yoga and meditation", "Deep breathing exercises", "Walking in nature", "Progressive muscle relaxation"],
                &["anxiety", "worried", "nervous", "panic", "racing heart", "sweating", "restless", "fear", "anxious"],
            ),
        ];
        Self { profiles }
    }
}

/// Static lifestyle guidance served by the recommendations endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationSets {
    pub lifestyle: Vec<String>,
    pub nutrition: Vec<String>,
    pub preventive: Vec<String>,
}

pub fn personalized_recommendations() -> RecommendationSets {
    RecommendationSets {
        lifestyle: strings(&[
            "Maintain regular sleep schedule (7-9 hours)",
            "Stay hydrated (8 glasses of water daily)",
            "Exercise regularly (30 minutes, 5 days/week)",
            "Practice stress management techniques",
        ]),
        nutrition: strings(&[
            "Eat a balanced diet rich in fruits and vegetables",
            "Limit processed foods and added sugars",
            "Include omega-3 fatty acids in your diet",
            "Consider vitamin D supplementation",
        ]),
        preventive: strings(&[
            "Schedule regular check-ups with your healthcare provider",
            "Stay up to date with vaccinations",
            "Monitor blood pressure and cholesterol",
            "Practice good hygiene habits",
        ]),
    }
}

/// Number of distinct profile keywords contained in the lowered text.
/// Blank keywords never count.
fn keyword_hits(keywords: &[String], lowered: &str) -> usize {
    keywords
        .iter()
        .filter(|k| {
            let k = k.trim().to_lowercase();
            !k.is_empty() && lowered.contains(&k)
        })
        .count()
}

fn adjust_confidence(base: u8, hits: usize) -> u8 {
    (base as i32 + hits as i32 * CONFIDENCE_PER_HIT).clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEIL) as u8
}

#[allow(clippy::too_many_arguments)]
fn profile(
    key: &str,
    disease: &str,
    confidence: u8,
    description: &str,
    medications: &[&str],
    side_effects: &[&str],
    precautions: &[&str],
    diet: &[&str],
    exercise: &[&str],
    keywords: &[&str],
) -> DiseaseProfile {
    DiseaseProfile {
        key: key.to_string(),
        disease: disease.to_string(),
        confidence,
        description: description.to_string(),
        medications: strings(medications),
        side_effects: strings(side_effects),
        precautions: strings(precautions),
        diet: strings(diet),
        exercise: strings(exercise),
        keywords: strings(keywords),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predictor() -> Predictor {
        Predictor::default_seed()
    }

    #[test]
    fn zero_hits_fall_back_to_first_profile_unadjusted() {
        let report = predictor().predict("completely unrelated text").unwrap();
        assert_eq!(report.disease, "Common Cold");
        assert_eq!(report.confidence, 85);
    }

    #[test]
    fn keyword_hits_raise_confidence() {
        // one cold keyword: 85 + 5
        let report = predictor().predict("terrible congestion since yesterday").unwrap();
        assert_eq!(report.disease, "Common Cold");
        assert_eq!(report.confidence, 90);
    }

    #[test]
    fn ties_go_to_the_later_profile() {
        // "runny nose" scores 1 for both the cold and the allergy profile.
        let report = predictor().predict("runny nose").unwrap();
        assert_eq!(report.disease, "Seasonal Allergies (Allergic Rhinitis)");
        assert_eq!(report.confidence, 83);
    }

    #[test]
    fn confidence_is_capped_at_the_ceiling() {
        let report = predictor()
            .predict("migraine, severe headache, throbbing pulsing pain, nausea, light sensitivity, sound sensitivity, aura")
            .unwrap();
        assert_eq!(report.disease, "Migraine Headache");
        assert_eq!(report.confidence, 95);
    }

    #[test]
    fn confidence_is_lifted_to_the_floor() {
        let p: Predictor = serde_json::from_str(
            r#"{"profiles":[{"key":"x","disease":"X","confidence":40,"description":"d","keywords":["zzz"]}]}"#,
        )
        .unwrap();
        let report = p.predict("zzz").unwrap();
        assert_eq!(report.confidence, 60);
    }

    #[test]
    fn missing_file_falls_back_to_seed() {
        let p = Predictor::load_from_file("definitely/not/here.json");
        assert_eq!(p.profiles().len(), 6);
    }

    #[test]
    fn recommendations_come_in_three_sets_of_four() {
        let r = personalized_recommendations();
        assert_eq!(r.lifestyle.len(), 4);
        assert_eq!(r.nutrition.len(), 4);
        assert_eq!(r.preventive.len(), 4);
    }

    #[test]
    fn empty_profile_table_predicts_nothing() {
        let p: Predictor = serde_json::from_str(r#"{"profiles":[]}"#).unwrap();
        assert!(p.predict("cough").is_none());
    }
}
