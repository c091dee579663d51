//! Chat response engine.
//!
//! `respond` walks a fixed precedence: emergency gate, dataset reply,
//! built-in knowledge, smalltalk rules, generic fallback. The first
//! stage with something to say wins, and every reply is tagged with the
//! stage that produced it plus a typed urgency.

pub mod knowledge;
pub mod rules;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::advisor::dataset_reply;
use crate::chat::knowledge::{KnowledgeBase, SymptomEntry};
use crate::chat::rules::HotReloadRules;
use crate::dataset::records::Urgency;
use crate::dataset::DatasetHandle;
use crate::history::anon_hash;
use crate::triage::{EmergencyLexicon, CHAT_EMERGENCY_BANNER};

const EMPTY_PROMPT: &str = "I understand you're concerned about your health. Could you describe your specific symptoms? I can help provide general information and guide you to appropriate care.";

const APOLOGY: &str = "I apologize, but I'm having trouble processing your request right now. For immediate health concerns, please consult a healthcare professional. You can also try the symptom checker for health predictions.";

const GENERAL_FALLBACK: &str = "I'm here to provide comprehensive health solutions including symptom analysis, precautions, exercise recommendations, and dietary guidance. I can help solve your health problems with evidence-based information. What specific health concern can I help you with today?";

const KNOWLEDGE_TIP: &str = "Tip: For a more detailed analysis, try the symptom checker for personalized health insights.";

/// Which stage of the precedence produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Emergency,
    Dataset,
    Knowledge,
    Smalltalk,
    Fallback,
}

impl ReplySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Emergency => "emergency",
            Self::Dataset => "dataset",
            Self::Knowledge => "knowledge",
            Self::Smalltalk => "smalltalk",
            Self::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub urgency: Urgency,
    pub source: ReplySource,
}

impl ChatReply {
    fn new(reply: impl Into<String>, urgency: Urgency, source: ReplySource) -> Self {
        Self {
            reply: reply.into(),
            urgency,
            source,
        }
    }
}

/// Assessment of a plain symptom-name list, independent of free text.
#[derive(Debug, Clone, Serialize)]
pub struct SymptomAssessment {
    pub analysis: String,
    pub urgency: Urgency,
    pub recommendations: Vec<String>,
}

pub struct ChatEngine {
    dataset: DatasetHandle,
    knowledge: KnowledgeBase,
    rules: HotReloadRules,
    lexicon: Arc<EmergencyLexicon>,
}

impl ChatEngine {
    pub fn new(dataset: DatasetHandle, lexicon: Arc<EmergencyLexicon>) -> Self {
        Self {
            dataset,
            knowledge: KnowledgeBase::load_from_file(knowledge::DEFAULT_KNOWLEDGE_PATH),
            rules: HotReloadRules::new(None),
            lexicon,
        }
    }

    /// Assembly from explicit parts, for callers that manage their own
    /// knowledge table or rules file.
    pub fn with_parts(
        dataset: DatasetHandle,
        knowledge: KnowledgeBase,
        rules: HotReloadRules,
        lexicon: Arc<EmergencyLexicon>,
    ) -> Self {
        Self {
            dataset,
            knowledge,
            rules,
            lexicon,
        }
    }

    pub fn respond(&self, message: &str) -> ChatReply {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return ChatReply::new(EMPTY_PROMPT, Urgency::Low, ReplySource::Fallback);
        }

        if let Some(keyword) = self.lexicon.chat_emergency(trimmed) {
            if crate::config::dev_logging_enabled() {
                debug!(digest = %anon_hash(trimmed), keyword, "chat emergency gate hit");
            }
            return ChatReply::new(CHAT_EMERGENCY_BANNER, Urgency::High, ReplySource::Emergency);
        }

        let matches = match self.dataset.matches(trimmed) {
            Some(m) => m,
            None => {
                warn!("dataset store unreadable; serving the fallback apology");
                return ChatReply::new(APOLOGY, Urgency::Low, ReplySource::Fallback);
            }
        };

        if let Some(reply) = dataset_reply(&matches) {
            return ChatReply::new(reply.text, reply.urgency, ReplySource::Dataset);
        }

        let known = self.knowledge.find_in_message(trimmed);
        if !known.is_empty() {
            let (text, urgency) = symptom_advice(&known);
            return ChatReply::new(text, urgency, ReplySource::Knowledge);
        }

        if let Some(reply) = rules::first_reply(trimmed, &self.rules.current()) {
            return ChatReply::new(reply, Urgency::Low, ReplySource::Smalltalk);
        }

        ChatReply::new(GENERAL_FALLBACK, Urgency::Low, ReplySource::Fallback)
    }

    /// Assess a list of symptom names against the built-in knowledge.
    /// Unknown names count as low urgency.
    pub fn assess_symptoms(&self, symptoms: &[String]) -> SymptomAssessment {
        let names: Vec<&str> = symptoms
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        let urgency = names
            .iter()
            .map(|n| {
                self.knowledge
                    .get(n)
                    .map(|e| e.urgency)
                    .unwrap_or(Urgency::Low)
            })
            .max()
            .unwrap_or(Urgency::Low);

        let analysis = match names.as_slice() {
            [] => "No symptoms provided.".to_string(),
            [single] => format!(
                "The symptom \"{}\" can have various causes and should be properly evaluated.",
                single
            ),
            more => format!(
                "Based on the combination of symptoms ({}), this could indicate several conditions that require medical evaluation.",
                more.join(", ")
            ),
        };

        let mut recommendations = vec![
            "Monitor your symptoms closely".to_string(),
            "Keep a symptom diary with dates and severity".to_string(),
            "Stay hydrated and get adequate rest".to_string(),
        ];
        recommendations.push(if urgency == Urgency::High {
            "Seek immediate medical attention".to_string()
        } else {
            "Consider consulting a healthcare provider".to_string()
        });

        SymptomAssessment {
            analysis,
            urgency,
            recommendations,
        }
    }

    pub fn dataset(&self) -> &DatasetHandle {
        &self.dataset
    }
}

/// One advice block per matched entry. High-urgency entries render their
/// advice verbatim as a warning and suppress the appended checker tip.
fn symptom_advice(entries: &[&SymptomEntry]) -> (String, Urgency) {
    let mut parts: Vec<String> = Vec::new();
    let mut has_warning = false;

    for entry in entries {
        if entry.urgency == Urgency::High {
            has_warning = true;
            parts.push(entry.advice.clone());
        } else {
            let conditions = entry
                .conditions
                .iter()
                .take(2)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" or ");
            if conditions.is_empty() {
                parts.push(format!("For {}: {}", entry.symptom, entry.advice));
            } else {
                parts.push(format!(
                    "For {}: This could indicate {}. {}",
                    entry.symptom, conditions, entry.advice
                ));
            }
        }
    }

    let mut text = parts.join("\n\n");
    if !has_warning {
        text.push_str("\n\n");
        text.push_str(KNOWLEDGE_TIP);
    }

    let urgency = entries
        .iter()
        .map(|e| e.urgency)
        .max()
        .unwrap_or(Urgency::Low);
    (text, urgency)
}
