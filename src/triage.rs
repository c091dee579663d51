//! triage.rs — Emergency keyword gates.
//!
//! Both public surfaces run this check before anything else:
//!   - chat: a hit answers with the fixed banner, nothing else runs.
//!   - symptom checker: a hit skips the prediction entirely.
//!
//! Matching is plain lowercase containment, keyword lists in list order.
//! Lists come from the `[emergency]` config section; an empty list keeps
//! the built-in seed so a config file can override one gate without
//! silencing the other.

/// Fixed reply for the chat surface when an emergency keyword hits.
pub const CHAT_EMERGENCY_BANNER: &str = "MEDICAL EMERGENCY DETECTED\n\nIf this is a life-threatening emergency, call 911 (US) or your local emergency number immediately. Do not wait for online advice.\n\nFor severe symptoms like chest pain, difficulty breathing, or loss of consciousness, seek immediate medical attention.";

/// Fixed alert for the symptom checker surface.
pub const CHECKER_EMERGENCY_MESSAGE: &str = "Your symptoms may require immediate medical attention. Please call emergency services or visit the nearest emergency room.";

/// Seed keywords for the chat gate.
const CHAT_SEED: &[&str] = &[
    "chest pain",
    "difficulty breathing",
    "severe bleeding",
    "unconscious",
    "heart attack",
    "stroke",
    "severe burn",
    "choking",
    "poisoning",
    "severe allergic reaction",
    "suicide",
    "overdose",
];

/// Seed keywords for the checker gate. Deliberately not the same list:
/// "blood" alone counts here, the chat gate wants the fuller phrases.
const CHECKER_SEED: &[&str] = &[
    "chest pain",
    "difficulty breathing",
    "severe headache",
    "high fever",
    "blood",
    "unconscious",
    "stroke",
    "heart attack",
    "severe abdominal pain",
];

/// Keyword lists for the two gates.
#[derive(Debug, Clone)]
pub struct EmergencyLexicon {
    chat: Vec<String>,
    checker: Vec<String>,
}

impl Default for EmergencyLexicon {
    fn default() -> Self {
        Self {
            chat: seed(CHAT_SEED),
            checker: seed(CHECKER_SEED),
        }
    }
}

impl EmergencyLexicon {
    /// Builds a lexicon from configured lists; an empty list keeps the seed.
    pub fn from_lists(chat: Vec<String>, checker: Vec<String>) -> Self {
        Self {
            chat: if chat.is_empty() { seed(CHAT_SEED) } else { chat },
            checker: if checker.is_empty() {
                seed(CHECKER_SEED)
            } else {
                checker
            },
        }
    }

    /// First chat keyword contained in `text`, if any.
    pub fn chat_emergency(&self, text: &str) -> Option<&str> {
        first_hit(&self.chat, text)
    }

    /// First checker keyword contained in `text`, if any.
    pub fn checker_emergency(&self, text: &str) -> Option<&str> {
        first_hit(&self.checker, text)
    }

    pub fn chat_keywords(&self) -> &[String] {
        &self.chat
    }

    pub fn checker_keywords(&self) -> &[String] {
        &self.checker
    }
}

fn seed(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Lowercase containment over the list, in list order. Blank keywords
/// never match (a blank would otherwise match every input).
fn first_hit<'a>(keywords: &'a [String], text: &str) -> Option<&'a str> {
    let lowered = text.to_lowercase();
    if lowered.trim().is_empty() {
        return None;
    }
    keywords.iter().map(String::as_str).find(|k| {
        let k = k.trim().to_lowercase();
        !k.is_empty() && lowered.contains(&k)
    })
}
