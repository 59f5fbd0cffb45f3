use ort::Error as OrtError;
use std::fmt;

/// Represents the different types of errors that can occur while loading or querying a classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    /// The model bytes were invalid or the runtime could not create a session
    ModelLoadError(String),
    /// The runtime failed while running a single prediction
    InferenceError(String),
    /// The label mapping resource was missing or could not be parsed
    MappingSourceError(String),
    /// The model artifact carries no label mapping under the expected metadata key
    MappingNotFoundError(String),
    /// The builder was used incorrectly
    BuildError(String),
}

impl ClassifierError {
    /// True for the label mapping failures that a lenient session recovers from
    pub fn is_mapping_error(&self) -> bool {
        matches!(self, Self::MappingSourceError(_) | Self::MappingNotFoundError(_))
    }
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModelLoadError(msg) => write!(f, "Model load error: {}", msg),
            Self::InferenceError(msg) => write!(f, "Inference error: {}", msg),
            Self::MappingSourceError(msg) => write!(f, "Label mapping error: {}", msg),
            Self::MappingNotFoundError(msg) => write!(f, "Label mapping not found: {}", msg),
            Self::BuildError(msg) => write!(f, "Build error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}

impl From<OrtError> for ClassifierError {
    fn from(err: OrtError) -> Self {
        ClassifierError::ModelLoadError(err.to_string())
    }
}
