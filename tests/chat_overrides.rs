// tests/chat_overrides.rs
//
// Chat engine assembled from explicit parts: rules file on disk,
// knowledge table override, and a custom emergency lexicon.

use std::fs;
use std::sync::Arc;

use health_triage_assistant::chat::knowledge::KnowledgeBase;
use health_triage_assistant::chat::rules::HotReloadRules;
use health_triage_assistant::chat::{ChatEngine, ReplySource};
use health_triage_assistant::dataset::records::Urgency;
use health_triage_assistant::dataset::DatasetHandle;
use health_triage_assistant::triage::EmergencyLexicon;

#[test]
fn rules_file_replaces_the_smalltalk_seed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chat_rules.json");
    fs::write(
        &path,
        r#"{ "rules": [
            {
                "name": "ping",
                "when": { "any_contains": ["ping"] },
                "then": { "reply": "pong" }
            }
        ] }"#,
    )
    .unwrap();

    let engine = ChatEngine::with_parts(
        DatasetHandle::empty(),
        KnowledgeBase::load_from_file("no/such/file.json"), // seed table
        HotReloadRules::new(Some(&path)),
        Arc::new(EmergencyLexicon::default()),
    );

    let out = engine.respond("ping");
    assert_eq!(out.source, ReplySource::Smalltalk);
    assert_eq!(out.reply, "pong");

    // The file replaced the seed wholesale, so greetings no longer match.
    let out = engine.respond("hello");
    assert_eq!(out.source, ReplySource::Fallback);
}

#[test]
fn knowledge_override_file_changes_advice() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("knowledge.json");
    fs::write(
        &path,
        r#"{ "symptoms": [
            {
                "symptom": "vertigo",
                "conditions": ["inner ear trouble"],
                "severity": "mild",
                "urgency": "low",
                "advice": "Sit down and fix your gaze on one point."
            }
        ] }"#,
    )
    .unwrap();

    let engine = ChatEngine::with_parts(
        DatasetHandle::empty(),
        KnowledgeBase::load_from_file(&path),
        HotReloadRules::new(None),
        Arc::new(EmergencyLexicon::default()),
    );

    let out = engine.respond("recurring vertigo spells");
    assert_eq!(out.source, ReplySource::Knowledge);
    assert_eq!(out.urgency, Urgency::Low);
    assert!(out.reply.contains("inner ear trouble"), "{}", out.reply);
}

#[test]
fn emergency_lexicon_override_rewires_the_gate() {
    let lexicon = EmergencyLexicon::from_lists(vec!["code blue".into()], vec![]);
    let engine = ChatEngine::with_parts(
        DatasetHandle::empty(),
        KnowledgeBase::load_from_file("no/such/file.json"),
        HotReloadRules::new(None),
        Arc::new(lexicon),
    );

    let out = engine.respond("code blue in ward 3");
    assert_eq!(out.source, ReplySource::Emergency);
    assert_eq!(out.urgency, Urgency::High);

    // "chest pain" is no longer on the chat list, so the built-in
    // knowledge answers instead with its own warning line.
    let out = engine.respond("severe chest pain");
    assert_eq!(out.source, ReplySource::Knowledge);
    assert_eq!(out.urgency, Urgency::High);
    assert!(out.reply.starts_with("EMERGENCY:"), "{}", out.reply);
}
