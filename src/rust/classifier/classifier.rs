use std::sync::Arc;

use log::debug;

use super::engine::{InferenceEngine, LabelIndex};
use super::error::ClassifierError;
use super::mapping::{LabelMapping, LabelMappingSource};
use super::normalize::normalize;

/// Reply used when the predicted label has no entry in the mapping
pub const UNKNOWN_ANSWER: &str = "Unknown answer";

/// A ready question answering session: a loaded model plus its label mapping.
///
/// # Thread Safety
///
/// Both the engine and the mapping are read-only once built and held in
/// `Arc`, so a `Classifier` can be shared across threads:
///
/// ```rust,no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use qa_chatbot::{Classifier, LabelMappingSource};
/// use std::sync::Arc;
/// use std::thread;
///
/// let classifier = Arc::new(Classifier::builder()
///     .with_model_file("assets/qa_model.onnx")?
///     .with_label_source(LabelMappingSource::file("assets/label_mapping.json"))
///     .build()?);
///
/// let classifier_clone = Arc::clone(&classifier);
/// thread::spawn(move || {
///     classifier_clone.classify("Is water wet?").unwrap();
/// });
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Classifier {
    pub(crate) model_path: Option<String>,
    pub(crate) engine: Arc<dyn InferenceEngine>,
    pub(crate) label_mapping: Arc<LabelMapping>,
    pub(crate) label_source: LabelMappingSource,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the session
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            model_path: self.model_path.clone(),
            input_name: self.engine.input_name().to_string(),
            num_labels: self.label_mapping.len(),
            label_keys: self.label_mapping.keys(),
            label_source: self.label_source.to_string(),
        }
    }

    pub fn label_mapping(&self) -> &LabelMapping {
        &self.label_mapping
    }

    /// Normalizes the question and runs the model, returning the raw label index.
    pub fn predict_index(&self, question: &str) -> Result<LabelIndex, ClassifierError> {
        let normalized = normalize(question);
        self.engine.predict(&normalized)
    }

    /// Answers a question with the text of its predicted label.
    ///
    /// An index missing from the mapping is a normal outcome and yields
    /// [`UNKNOWN_ANSWER`]. Callers are expected to skip blank questions.
    ///
    /// # Errors
    /// - `InferenceError` if the model fails on this input; the session stays usable
    pub fn classify(&self, question: &str) -> Result<String, ClassifierError> {
        let index = self.predict_index(question)?;
        let reply = match self.label_mapping.resolve(&index.key()) {
            Some(answer) => answer,
            None => {
                debug!("Label index {} has no mapping entry", index);
                UNKNOWN_ANSWER
            }
        };
        Ok(reply.to_string())
    }
}
