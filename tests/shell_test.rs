use qa_chatbot::{
    ChatShell, ChatTurn, Classifier, ClassifierError, InferenceEngine, LabelIndex,
    LabelMappingSource, COULD_NOT_ANSWER, UNKNOWN_ANSWER,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Counts calls and answers with index 0, or fails, or sleeps first
#[derive(Debug, Default)]
struct CountingEngine {
    calls: Arc<AtomicUsize>,
    fail: bool,
    delay: Option<Duration>,
}

impl InferenceEngine for CountingEngine {
    fn input_name(&self) -> &str {
        "input"
    }

    fn predict(&self, _input: &str) -> Result<LabelIndex, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.fail {
            return Err(ClassifierError::InferenceError("runtime fault".into()));
        }
        Ok(LabelIndex(0))
    }

    fn custom_metadata(&self, _key: &str) -> Result<Option<String>, ClassifierError> {
        Ok(Some(r#"{"0":"Yes"}"#.to_string()))
    }
}

fn shell(engine: CountingEngine) -> ChatShell {
    let classifier = Classifier::builder()
        .with_engine(engine)
        .unwrap()
        .with_label_source(LabelMappingSource::model_metadata())
        .build()
        .unwrap();
    ChatShell::new(Arc::new(classifier))
}

#[test]
fn test_blank_input_never_reaches_classifier() {
    let calls = Arc::new(AtomicUsize::new(0));
    let shell = shell(CountingEngine { calls: Arc::clone(&calls), ..Default::default() });

    assert!(shell.respond("").is_none());
    assert!(shell.respond("   \t ").is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let turn = shell.respond("Is water wet?").unwrap();
    assert_eq!(turn, ChatTurn { question: "Is water wet?".into(), reply: "Yes".into() });
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_inference_failure_becomes_apology() {
    let shell = shell(CountingEngine { fail: true, ..Default::default() });
    let turn = shell.respond("Is water wet?").unwrap();
    assert_eq!(turn.reply, COULD_NOT_ANSWER);
    assert_ne!(turn.reply, UNKNOWN_ANSWER);
}

#[tokio::test]
async fn test_async_answer() {
    let shell = shell(CountingEngine::default()).with_timeout(Duration::from_secs(5));
    let turn = shell.respond_async("Is water wet?").await.unwrap();
    assert_eq!(turn.reply, "Yes");
    assert!(shell.respond_async("  ").await.is_none());
}

#[tokio::test]
async fn test_async_timeout_discards_result() {
    let calls = Arc::new(AtomicUsize::new(0));
    let shell = shell(CountingEngine {
        calls: Arc::clone(&calls),
        delay: Some(Duration::from_millis(500)),
        ..Default::default()
    })
    .with_timeout(Duration::from_millis(20));

    let turn = shell.respond_async("Is water wet?").await.unwrap();
    assert_eq!(turn.reply, COULD_NOT_ANSWER);

    // The abandoned prediction still runs to completion, exactly once
    tokio::time::sleep(Duration::from_millis(800)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
