//! A question answering chatbot core built on ONNX classification models.
//!
//! A question is normalized, fed to a classifier model, and the predicted
//! label index is looked up in a label mapping to produce the reply. The
//! mapping comes either from a JSON file packaged next to the model or from
//! the model's own custom metadata.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use qa_chatbot::{Classifier, LabelMappingSource};
//!
//! let classifier = Classifier::builder()
//!     .with_model_file("assets/qa_model.onnx")?
//!     .with_label_source(LabelMappingSource::file("assets/label_mapping.json"))
//!     .build()?;
//!
//! let reply = classifier.classify("What is the capital of France?")?;
//! println!("{}", reply);
//! # Ok(())
//! # }
//! ```
//!
//! # Label Mapping Failures
//!
//! By default a missing or malformed mapping does not stop the session from
//! being built; every question is then answered with [`UNKNOWN_ANSWER`].
//! Use [`MappingFailurePolicy::Fail`] to make it a build error instead:
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use qa_chatbot::{Classifier, LabelMappingSource, MappingFailurePolicy};
//!
//! let classifier = Classifier::builder()
//!     .with_model_file("assets/qa_model.onnx")?
//!     .with_label_source(LabelMappingSource::model_metadata())
//!     .with_mapping_policy(MappingFailurePolicy::Fail)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

pub mod classifier;
mod runtime;
pub mod assets;
pub mod shell;

pub use classifier::{
    normalize, Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, InferenceEngine,
    LabelIndex, LabelMapping, LabelMappingSource, MappingFailurePolicy, OnnxEngine,
    LABEL_MAPPING_KEY, UNKNOWN_ANSWER,
};
pub use runtime::{RuntimeConfig, create_session_builder};
pub use assets::{AssetError, AssetStore, DEFAULT_LABEL_MAPPING_FILE, DEFAULT_MODEL_FILE};
pub use shell::{ChatShell, ChatTurn, COULD_NOT_ANSWER};

/// Initializes `env_logger` from `RUST_LOG`, defaulting to `info`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
