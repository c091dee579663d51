//! Demo that runs a few canned messages through the chat engine (stdout only; dataset optional).

use std::sync::Arc;

use health_triage_assistant::chat::ChatEngine;
use health_triage_assistant::dataset::{self, source::FileSource, DatasetHandle};
use health_triage_assistant::triage::EmergencyLexicon;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let dataset = DatasetHandle::empty();
    let path = dataset::dataset_path();
    if let Err(e) = dataset::load_from_source(&dataset, &FileSource::new(&path)).await {
        eprintln!(
            "no dataset at {} ({:#}); replies use built-in knowledge",
            path.display(),
            e
        );
    }

    let engine = ChatEngine::new(dataset, Arc::new(EmergencyLexicon::default()));

    let seq = [
        "hello",
        "I have a headache and some nausea since this morning",
        "how does the prediction work?",
        "severe chest pain right now",
    ];

    for message in seq {
        let reply = engine.respond(message);
        println!("> {}", message);
        println!("[{} / {:?}]", reply.source.as_str(), reply.urgency);
        println!("{}\n", reply.reply);
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    }

    println!("chat-demo done");
}
