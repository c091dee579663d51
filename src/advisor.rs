// src/advisor.rs
//! Composes dataset matches into user-facing guidance: the sectioned chat
//! reply and the structured health solution. Pure functions over a
//! `MatchSet`; no locking, no I/O.

use serde::Serialize;

use crate::dataset::records::Urgency;
use crate::dataset::MatchSet;

// Display caps keep replies short even when broad inputs match a lot.
const MAX_SYMPTOM_SECTIONS: usize = 2;
const MAX_CONDITIONS_SHOWN: usize = 3;
const MAX_URGENT_CONDITIONS: usize = 2;
const MAX_DISEASE_SECTIONS: usize = 2;
const MAX_DISEASE_SYMPTOMS: usize = 3;
const MAX_TREATMENTS: usize = 2;
const MAX_PRECAUTION_GROUPS: usize = 2;
const MAX_PRECAUTION_ITEMS: usize = 3;
const MAX_WORKOUT_GROUPS: usize = 2;
const MAX_EXERCISES: usize = 3;
const MAX_DIET_GROUPS: usize = 2;
const MAX_FOODS: usize = 4;
const MAX_AVOID_FOODS: usize = 3;
const SOLUTION_ITEM_CAP: usize = 5;

pub const CHECKER_TIP: &str =
    "Tip: Use the symptom checker for a more detailed analysis and personalized recommendations.";

/// A composed reply plus the urgency the caller should surface.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetReply {
    pub text: String,
    pub urgency: Urgency,
    /// True when the high-urgency short-circuit produced the text.
    pub urgent: bool,
}

/// Compose the sectioned reply. None when nothing matched at all.
///
/// A high-urgency symptom match short-circuits to a single URGENT line;
/// otherwise matched sections render in fixed order with fixed caps.
pub fn dataset_reply(m: &MatchSet) -> Option<DatasetReply> {
    if m.is_empty() {
        return None;
    }

    if let Some(urgent) = m.symptoms.iter().find(|s| s.urgency == Urgency::High) {
        let advice = urgent
            .recommendations
            .first()
            .map(String::as_str)
            .unwrap_or("Seek immediate medical attention.");
        let conditions = urgent
            .conditions
            .iter()
            .take(MAX_URGENT_CONDITIONS)
            .cloned()
            .collect::<Vec<_>>()
            .join(" or ");
        let text = if conditions.is_empty() {
            format!(
                "URGENT: The symptom \"{}\" may indicate a serious condition. {advice}",
                urgent.name
            )
        } else {
            format!(
                "URGENT: The symptom \"{}\" may indicate serious conditions including {conditions}. {advice}",
                urgent.name
            )
        };
        return Some(DatasetReply {
            text,
            urgency: Urgency::High,
            urgent: true,
        });
    }

    let mut out = String::new();

    if !m.symptoms.is_empty() {
        out.push_str("## Symptom Analysis\n");
        for s in m.symptoms.iter().take(MAX_SYMPTOM_SECTIONS) {
            let mut line = format!("**{}**: {}", capitalize_first(&s.name), s.description);
            if !s.conditions.is_empty() {
                let shown = s
                    .conditions
                    .iter()
                    .take(MAX_CONDITIONS_SHOWN)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ");
                line.push_str(&format!(" This could indicate: {shown}."));
            }
            if let Some(rec) = s.recommendations.first() {
                line.push_str(&format!(" Recommendations: {rec}"));
            }
            out.push_str(line.trim_end());
            out.push_str("\n\n");
        }
    }

    if !m.diseases.is_empty() {
        out.push_str("## Related Conditions\n");
        for d in m.diseases.iter().take(MAX_DISEASE_SECTIONS) {
            out.push_str(&format!("**{}**: {}\n", d.name, d.description));
            if !d.symptoms.is_empty() {
                let shown = d
                    .symptoms
                    .iter()
                    .take(MAX_DISEASE_SYMPTOMS)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ");
                out.push_str(&format!("- Symptoms: {shown}\n"));
            }
            if !d.treatments.is_empty() {
                let shown = d
                    .treatments
                    .iter()
                    .take(MAX_TREATMENTS)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ");
                out.push_str(&format!("- Treatments: {shown}\n"));
            }
            out.push('\n');
        }
    }

    if !m.precautions.is_empty() {
        out.push_str("## Precautions\n");
        for p in m.precautions.iter().take(MAX_PRECAUTION_GROUPS) {
            out.push_str(&format!("**For {}**:\n", p.condition));
            for item in p.precautions.iter().take(MAX_PRECAUTION_ITEMS) {
                out.push_str(&format!("- {item}\n"));
            }
            out.push('\n');
        }
    }

    if !m.workouts.is_empty() {
        out.push_str("## Recommended Exercises\n");
        for w in m.workouts.iter().take(MAX_WORKOUT_GROUPS) {
            out.push_str(&format!(
                "**For {}** ({} intensity):\n",
                w.condition,
                w.intensity.as_str()
            ));
            for exercise in w.exercises.iter().take(MAX_EXERCISES) {
                out.push_str(&format!("- {exercise}\n"));
            }
            out.push_str(&format!(
                "Duration: {} | Frequency: {}\n\n",
                w.duration, w.frequency
            ));
        }
    }

    if !m.diets.is_empty() {
        out.push_str("## Dietary Recommendations\n");
        for d in m.diets.iter().take(MAX_DIET_GROUPS) {
            out.push_str(&format!("**For {}**:\n", d.condition));
            if !d.foods.is_empty() {
                let shown = d
                    .foods
                    .iter()
                    .take(MAX_FOODS)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ");
                out.push_str(&format!("- Recommended: {shown}\n"));
            }
            if !d.avoid_foods.is_empty() {
                let shown = d
                    .avoid_foods
                    .iter()
                    .take(MAX_AVOID_FOODS)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ");
                out.push_str(&format!("- Avoid: {shown}\n"));
            }
            if let Some(instruction) = d.instructions.first() {
                out.push_str(&format!("- Instructions: {instruction}\n"));
            }
            out.push('\n');
        }
    }

    let mut text = out.trim_end().to_string();
    text.push_str("\n\n");
    text.push_str(CHECKER_TIP);

    let urgency = m
        .symptoms
        .iter()
        .map(|s| s.urgency)
        .max()
        .unwrap_or(Urgency::Low);
    Some(DatasetReply {
        text,
        urgency,
        urgent: false,
    })
}

/// The structured "complete solution" for one described problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSolution {
    pub analysis: String,
    pub precautions: Vec<String>,
    pub workouts: Vec<String>,
    pub diets: Vec<String>,
    pub urgency: Urgency,
}

/// None unless a symptom or disease matched. Lists are first-seen-order
/// unions across symptom, record, and disease contributions, capped.
pub fn health_solution(m: &MatchSet) -> Option<HealthSolution> {
    let analysis = match (m.symptoms.first(), m.diseases.first()) {
        (Some(symptom), _) => {
            let conditions = symptom
                .conditions
                .iter()
                .take(2)
                .cloned()
                .collect::<Vec<_>>()
                .join(" or ");
            if conditions.is_empty() {
                format!(
                    "Based on your symptoms, this could be related to: {}",
                    symptom.name
                )
            } else {
                format!("Based on your symptoms, this could be related to: {conditions}")
            }
        }
        (None, Some(disease)) => format!(
            "Based on the information provided, this appears to be related to {}",
            disease.name
        ),
        (None, None) => return None,
    };

    let urgency = m
        .symptoms
        .iter()
        .map(|s| s.urgency)
        .max()
        .unwrap_or(Urgency::Low);

    let precautions = dedup_capped(
        m.symptoms
            .iter()
            .flat_map(|s| &s.precautions)
            .chain(m.precautions.iter().flat_map(|p| &p.precautions))
            .chain(m.diseases.iter().flat_map(|d| &d.precautions)),
    );
    let workouts = dedup_capped(
        m.symptoms
            .iter()
            .flat_map(|s| &s.workouts)
            .chain(m.workouts.iter().flat_map(|w| &w.exercises))
            .chain(m.diseases.iter().flat_map(|d| &d.workouts)),
    );
    let diets = dedup_capped(
        m.symptoms
            .iter()
            .flat_map(|s| &s.diets)
            .chain(m.diets.iter().flat_map(|d| &d.foods))
            .chain(m.diseases.iter().flat_map(|d| &d.diets)),
    );

    Some(HealthSolution {
        analysis,
        precautions,
        workouts,
        diets,
        urgency,
    })
}

/// Distinct items in first-seen order, at most `SOLUTION_ITEM_CAP`.
fn dedup_capped<'a>(items: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if out.iter().any(|seen| seen == item) {
            continue;
        }
        out.push(item.clone());
        if out.len() == SOLUTION_ITEM_CAP {
            break;
        }
    }
    out
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
