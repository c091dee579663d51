//! Smalltalk rules engine (reloaded from `config/chat_rules.json`).
//!
//! Minimal JSON DSL for conditions over the message text (case-insensitive):
//! - `any_contains`: match if ANY of the phrases appears
//! - `all_contains`: match if ALL of the phrases appear
//! - `not_contains`: match if NONE of the phrases appear
//! - `min_len`:      match if message length >= min_len (chars)
//!
//! The first matching rule wins and its `reply` is returned as-is.
//! A built-in seed covers greetings and common capability questions; a
//! readable rules file replaces the seed. The file is re-checked on
//! mtime change at each `current()` call. Blank phrases never match.

use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::RwLock,
    time::SystemTime,
};

pub const DEFAULT_RULES_PATH: &str = "config/chat_rules.json";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    pub name: Option<String>,
    #[serde(default)]
    pub when: When,
    #[serde(default)]
    pub then: Then,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct When {
    pub any_contains: Option<Vec<String>>,
    pub all_contains: Option<Vec<String>>,
    pub not_contains: Option<Vec<String>>,
    pub min_len: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Then {
    pub reply: Option<String>,
}

impl RuleSet {
    /// Built-in smalltalk rules, in conversational priority order.
    pub(crate) fn default_seed() -> Self {
        let rules = vec![
            rule(
                "greeting",
                any(&["hello", "hi", "hey"]),
                "Hello! I'm your AI health assistant powered by comprehensive medical datasets. I can provide symptom analysis, precautions, workout recommendations, dietary advice, and complete health solutions. What health concerns can I help you with today?",
            ),
            rule(
                "how it works",
                When {
                    all_contains: Some(vec!["how".into()]),
                    any_contains: Some(vec!["work".into(), "predict".into()]),
                    ..Default::default()
                },
                "Our AI analyzes your symptoms using advanced machine learning trained on medical data. It considers symptom patterns, severity, medical knowledge, precautions, workouts, and dietary recommendations to provide comprehensive health solutions. Use the symptom checker for personalized predictions!",
            ),
            rule(
                "thanks",
                any(&["thank"]),
                "You're welcome! Remember, I provide evidence-based health information including precautions, exercises, and dietary advice for educational purposes. For medical diagnosis and treatment, always consult qualified healthcare professionals. How else can I assist you?",
            ),
            rule(
                "doctor",
                any(&["doctor", "medical"]),
                "While I can provide comprehensive health information including symptoms analysis, precautions, workouts, and diet recommendations, it's important to consult with healthcare professionals for medical concerns. I can help you understand symptoms and provide evidence-based guidance. What would you like to know?",
            ),
            rule(
                "medication",
                any(&["medication", "treatment"]),
                "I can provide general information about treatments, precautions, supportive exercises, and dietary approaches, but specific medication recommendations must come from licensed healthcare providers. Our system can suggest comprehensive care approaches. What symptoms are you experiencing?",
            ),
            rule(
                "workout",
                any(&["workout", "exercise"]),
                "I can recommend specific exercises and workout routines based on your health condition or symptoms. These are evidence-based recommendations that can support your health journey. What condition or health goal would you like exercise guidance for?",
            ),
            rule(
                "diet",
                any(&["diet", "nutrition"]),
                "I can provide dietary recommendations and nutritional guidance based on your health condition or symptoms. This includes foods to eat, foods to avoid, and specific dietary instructions. What health condition would you like dietary advice for?",
            ),
        ];
        Self { rules }
    }
}

fn rule(name: &str, when: When, reply: &str) -> Rule {
    Rule {
        name: Some(name.to_string()),
        when,
        then: Then {
            reply: Some(reply.to_string()),
        },
    }
}

fn any(phrases: &[&str]) -> When {
    When {
        any_contains: Some(phrases.iter().map(|p| p.to_string()).collect()),
        ..Default::default()
    }
}

#[derive(Debug)]
pub struct HotReloadRules {
    path: PathBuf,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    rules: RuleSet,
    last_modified: Option<SystemTime>,
}

impl HotReloadRules {
    pub fn new(path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RULES_PATH));
        Self {
            path,
            inner: RwLock::new(State {
                rules: RuleSet::default_seed(),
                last_modified: None,
            }),
        }
    }

    pub fn current(&self) -> RuleSet {
        // Check if reload is needed
        let (needs_reload, _new_mtime) = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(mtime) => {
                let guard = self.inner.read().unwrap();
                let changed = guard.last_modified != Some(mtime);
                (changed, Some(mtime))
            }
            Err(_) => (false, None),
        };

        if !needs_reload {
            return self.inner.read().unwrap().rules.clone();
        }

        let mut guard = self.inner.write().unwrap();
        if let Ok(meta) = fs::metadata(&self.path) {
            if let Ok(mtime) = meta.modified() {
                if guard.last_modified != Some(mtime) {
                    if let Ok(rules) = load_rules_file(&self.path) {
                        guard.rules = rules;
                        guard.last_modified = Some(mtime);
                    }
                }
            }
        }
        guard.rules.clone()
    }
}

pub fn load_rules_file(path: &Path) -> io::Result<RuleSet> {
    let bytes = fs::read(path)?;
    let rules: RuleSet = serde_json::from_slice(&bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(rules)
}

/// Reply of the first rule matching `input_text`, if any.
/// Matching rules without a `reply` are skipped.
pub fn first_reply(input_text: &str, rules: &RuleSet) -> Option<String> {
    let text = normalize(input_text);
    for rule in &rules.rules {
        if matches_when(&text, &rule.when) {
            if let Some(reply) = &rule.then.reply {
                return Some(reply.clone());
            }
        }
    }
    None
}

// --- internals ---

fn matches_when(text: &str, w: &When) -> bool {
    if let Some(min) = w.min_len {
        if text.chars().count() < min {
            return false;
        }
    }
    if let Some(v) = &w.any_contains {
        if !v.iter().any(|p| contains(text, p)) {
            return false;
        }
    }
    if let Some(v) = &w.all_contains {
        if !v.iter().all(|p| contains(text, p)) {
            return false;
        }
    }
    if let Some(v) = &w.not_contains {
        if v.iter().any(|p| contains(text, p)) {
            return false;
        }
    }
    true
}

fn contains(text: &str, pat: &str) -> bool {
    let t = normalize(text);
    let p = normalize(pat);
    // A blank phrase would match every message.
    if p.is_empty() {
        return false;
    }
    t.contains(p.as_str())
}

fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_space = false;
    for ch in input.chars() {
        let lc = ch.to_ascii_lowercase();
        if lc.is_whitespace() {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
        } else {
            out.push(lc);
            last_space = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn first_matching_rule_wins() {
        let rules = RuleSet::default_seed();
        // "thank you doctor" hits both the thanks and the doctor rule;
        // thanks comes first in the seed.
        let reply = first_reply("thank you doctor", &rules).unwrap();
        assert!(reply.starts_with("You're welcome!"));
    }

    #[test]
    fn capability_rule_needs_both_halves() {
        let rules = RuleSet::default_seed();
        assert!(first_reply("how does the prediction work?", &rules)
            .unwrap()
            .contains("symptom checker"));
        assert_eq!(first_reply("does it really?", &rules), None);
    }

    #[test]
    fn phrases_match_as_substrings() {
        let rules = RuleSet::default_seed();
        // "hi" inside "this" trips the greeting rule.
        let reply = first_reply("what is this", &rules).unwrap();
        assert!(reply.starts_with("Hello!"));
    }

    #[test]
    fn case_and_whitespace_insensitive() {
        let rules = RuleSet {
            rules: vec![Rule {
                name: Some("lenient contains".into()),
                when: When {
                    any_contains: Some(vec!["balanced diet".into()]),
                    ..Default::default()
                },
                then: Then {
                    reply: Some("found".into()),
                },
            }],
        };
        assert_eq!(
            first_reply("  BALANCED   DIET\tplease ", &rules).as_deref(),
            Some("found")
        );
    }

    #[test]
    fn blank_phrase_never_matches() {
        let rules = RuleSet {
            rules: vec![Rule {
                name: None,
                when: When {
                    any_contains: Some(vec!["  ".into()]),
                    ..Default::default()
                },
                then: Then {
                    reply: Some("hijacked".into()),
                },
            }],
        };
        assert_eq!(first_reply("anything at all", &rules), None);
    }

    #[test]
    fn missing_file_keeps_the_seed() {
        let hot = HotReloadRules::new(Some(Path::new("no/such/rules.json")));
        assert_eq!(hot.current().rules.len(), 7);
    }

    #[test]
    fn readable_file_replaces_the_seed() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(
            tmp,
            r#"{{"rules":[{{"name":"hours","when":{{"any_contains":["open"]}},"then":{{"reply":"We are always open."}}}}]}}"#
        )
        .unwrap();
        tmp.flush().unwrap();

        let hot = HotReloadRules::new(Some(tmp.path()));
        let rules = hot.current();
        assert_eq!(rules.rules.len(), 1);
        assert_eq!(
            first_reply("are you open today?", &rules).as_deref(),
            Some("We are always open.")
        );
    }
}
