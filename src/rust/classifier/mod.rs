mod error;
mod engine;
mod mapping;
mod normalize;
#[allow(clippy::module_inception)]
mod classifier;
pub mod builder;

pub use error::ClassifierError;
pub use engine::{InferenceEngine, LabelIndex, OnnxEngine};
pub use mapping::{LabelMapping, LabelMappingSource, MappingFailurePolicy, LABEL_MAPPING_KEY};
pub use normalize::normalize;
pub use classifier::{Classifier, UNKNOWN_ANSWER};
pub use builder::ClassifierBuilder;

/// Information about a loaded classifier session
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Path to the ONNX model file, if the model was loaded from disk
    pub model_path: Option<String>,
    /// Name of the model input the question is fed to
    pub input_name: String,
    /// Number of labels in the mapping
    pub num_labels: usize,
    /// Label keys, sorted
    pub label_keys: Vec<String>,
    /// Where the label mapping came from
    pub label_source: String,
}
