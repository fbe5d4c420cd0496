mod common;

use std::sync::Arc;

use documind::chat::run_chat_until;
use documind::config::RetrievalSettings;
use documind::rag::{RagEngine, NOT_FOUND_ANSWER};
use documind::Error;

use common::{FakeEmbedder, FakeGenerator, FakeStore};

async fn chat(store: FakeStore, generator: Arc<FakeGenerator>, input: &str) -> String {
    let engine = RagEngine::new(
        Arc::new(FakeEmbedder::default()),
        Arc::new(store),
        generator,
        RetrievalSettings::default(),
    );
    let mut output = Vec::new();
    run_chat_until(&engine, input.as_bytes(), &mut output, std::future::pending())
        .await
        .unwrap();
    String::from_utf8(output).unwrap()
}

#[tokio::test]
async fn answers_then_evaluates() {
    let generator = Arc::new(FakeGenerator::replying(vec![
        Ok("Five days.".to_string()),
        Ok(r#"{"score": 8, "verdict": "Pass", "reasoning": "supported"}"#.to_string()),
    ]));
    let store = FakeStore::with_results(&[("Refunds take five days.", 0.9)]);

    let output = chat(store, generator.clone(), "How long are refunds?\nexit\n").await;

    assert!(output.contains("\nAssistant: Five days.\n"));
    assert!(output.contains("[Eval] Score: 8/10  |  Verdict: Pass"));
    assert!(output.contains("Reasoning: supported"));
    assert_eq!(generator.call_count(), 2);
}

#[tokio::test]
async fn empty_context_skips_evaluation() {
    let generator = Arc::new(FakeGenerator::default());

    let output = chat(FakeStore::default(), generator.clone(), "Unknown topic?\n\n").await;

    assert!(output.contains(&format!("Assistant: {NOT_FOUND_ANSWER}")));
    assert!(output.contains("[Eval] Skipped – no context was retrieved."));
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn failed_turn_does_not_end_the_loop() {
    let generator = Arc::new(FakeGenerator::replying(vec![
        Err(Error::Generation("500 Internal Server Error".to_string())),
        Ok("Second answer.".to_string()),
        Ok("not json at all".to_string()),
    ]));
    let store = FakeStore::with_results(&[("context", 0.8)]);

    let output = chat(store, generator.clone(), "first\nsecond\nquit\nnever asked\n").await;

    assert!(output.contains("Assistant: Second answer."));
    assert!(output.contains("Verdict: Error"));
    assert_eq!(output.matches("You: ").count(), 3);
    assert_eq!(generator.call_count(), 3);
}

#[tokio::test]
async fn end_of_input_ends_the_loop() {
    let generator = Arc::new(FakeGenerator::default());
    let output = chat(FakeStore::default(), generator, "").await;
    assert_eq!(output, "\nYou: \n");
}

#[tokio::test]
async fn interrupt_while_waiting_for_input_ends_cleanly() {
    let generator = Arc::new(FakeGenerator::default());
    let engine = RagEngine::new(
        Arc::new(FakeEmbedder::default()),
        Arc::new(FakeStore::default()),
        generator.clone(),
        RetrievalSettings::default(),
    );
    // The write half stays open, so the read half never yields a line.
    let (_keyboard, terminal) = tokio::io::duplex(64);
    let mut output = Vec::new();

    let result = run_chat_until(
        &engine,
        tokio::io::BufReader::new(terminal),
        &mut output,
        std::future::ready(()),
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(String::from_utf8(output).unwrap(), "\nYou: \n");
    assert_eq!(generator.call_count(), 0);
}
