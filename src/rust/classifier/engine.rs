use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use log::{debug, info};
use ndarray::Array1;
use ort::session::Session;
use ort::value::Tensor;

use super::error::ClassifierError;
use crate::runtime::{create_session_builder, RuntimeConfig};

/// The raw class index produced by a classification model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelIndex(pub i64);

impl LabelIndex {
    /// The decimal form used as a key into a label mapping
    pub fn key(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for LabelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Runs a loaded classification model against normalized text.
///
/// Implementations own their runtime state and are loaded once. `predict`
/// takes `&self` so a single engine can serve concurrent callers; an engine
/// whose runtime cannot do that must serialize internally.
pub trait InferenceEngine: Send + Sync + fmt::Debug {
    /// Name of the model input the text is fed to
    fn input_name(&self) -> &str;

    /// Predicts the class index for already-normalized text.
    ///
    /// # Errors
    /// - `InferenceError` if the runtime fails or the output is not an integer array
    fn predict(&self, input: &str) -> Result<LabelIndex, ClassifierError>;

    /// Reads a value from the model artifact's custom metadata table.
    ///
    /// Returns `Ok(None)` when the key is absent.
    fn custom_metadata(&self, key: &str) -> Result<Option<String>, ClassifierError>;
}

/// An [`InferenceEngine`] backed by an ONNX Runtime session.
///
/// The model is expected to:
/// - Accept one string tensor of shape `[1]` under its first declared input
/// - Produce an int64 tensor as its first output, the predicted label first
#[derive(Debug)]
pub struct OnnxEngine {
    session: Session,
    input_name: String,
}

impl OnnxEngine {
    /// Creates a session from in-memory model bytes.
    ///
    /// # Errors
    /// - `ModelLoadError` if the runtime cannot initialize
    /// - `ModelLoadError` if the bytes are not a valid model
    /// - `ModelLoadError` if the model has no inputs or no outputs
    pub fn load(model_bytes: &[u8], config: &RuntimeConfig) -> Result<Self, ClassifierError> {
        if model_bytes.is_empty() {
            return Err(ClassifierError::ModelLoadError("Model bytes are empty".into()));
        }

        let session = create_session_builder(config)?
            .commit_from_memory(model_bytes)
            .map_err(|e| ClassifierError::ModelLoadError(format!("Failed to create session: {}", e)))?;

        validate_model(&session)?;

        // Artifacts name their text input differently, so take whatever comes first.
        let input_name = session.inputs[0].name.clone();
        info!(
            "Loaded model ({} bytes), input '{}', {} output(s)",
            model_bytes.len(),
            input_name,
            session.outputs.len()
        );

        Ok(Self { session, input_name })
    }

    /// Reads a model file fully into memory and loads it.
    pub fn load_file(path: impl AsRef<Path>, config: &RuntimeConfig) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            ClassifierError::ModelLoadError(format!("Failed to read model file {}: {}", path.display(), e))
        })?;
        Self::load(&bytes, config)
    }
}

impl InferenceEngine for OnnxEngine {
    fn input_name(&self) -> &str {
        &self.input_name
    }

    fn predict(&self, input: &str) -> Result<LabelIndex, ClassifierError> {
        let text = Array1::from_vec(vec![input.to_owned()]);
        let tensor = Tensor::<String>::from_string_array(text)
            .map_err(|e| ClassifierError::InferenceError(format!("Failed to create input tensor: {}", e)))?;

        let mut input_tensors = HashMap::new();
        input_tensors.insert(self.input_name.as_str(), tensor);

        let outputs = self.session.run(input_tensors)
            .map_err(|e| ClassifierError::InferenceError(format!("Failed to run model: {}", e)))?;
        let labels = outputs[0].try_extract_tensor::<i64>()
            .map_err(|e| ClassifierError::InferenceError(format!("Failed to extract label tensor: {}", e)))?;

        let index = labels.iter().next().copied()
            .ok_or_else(|| ClassifierError::InferenceError("Model returned an empty label tensor".into()))?;

        debug!("Predicted label index {} for {:?}", index, input);
        Ok(LabelIndex(index))
    }

    fn custom_metadata(&self, key: &str) -> Result<Option<String>, ClassifierError> {
        let metadata = self.session.metadata()
            .map_err(|e| ClassifierError::MappingSourceError(format!("Failed to read model metadata: {}", e)))?;
        metadata.custom(key)
            .map_err(|e| ClassifierError::MappingSourceError(format!("Failed to read metadata key '{}': {}", key, e)))
    }
}

/// Validates that the model has at least one input and one output
fn validate_model(session: &Session) -> Result<(), ClassifierError> {
    if session.inputs.is_empty() {
        return Err(ClassifierError::ModelLoadError(
            "Model must declare a text input, found none".to_string()
        ));
    }
    if session.outputs.is_empty() {
        return Err(ClassifierError::ModelLoadError(
            "Model must have at least 1 output for the predicted label".to_string()
        ));
    }
    Ok(())
}
