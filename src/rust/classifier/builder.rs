use std::path::Path;
use std::sync::Arc;

use log::{error, info};

use super::classifier::Classifier;
use super::engine::{InferenceEngine, OnnxEngine};
use super::error::ClassifierError;
use super::mapping::{LabelMappingSource, MappingFailurePolicy};
use crate::runtime::RuntimeConfig;

/// A builder for constructing a Classifier with a fluent interface.
///
/// The builder is the not-yet-ready state of a session; only
/// [`build`](Self::build) produces a usable [`Classifier`].
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    model_path: Option<String>,
    engine: Option<Arc<dyn InferenceEngine>>,
    label_source: Option<LabelMappingSource>,
    mapping_policy: MappingFailurePolicy,
    runtime_config: RuntimeConfig,
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance with default configuration
    ///
    /// # Example
    /// ```
    /// use qa_chatbot::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the runtime configuration for ONNX model execution.
    ///
    /// Must be called before the model is loaded to take effect.
    ///
    /// # Example
    /// ```
    /// use qa_chatbot::{ClassifierBuilder, RuntimeConfig};
    ///
    /// let config = RuntimeConfig { intra_threads: 1, ..RuntimeConfig::default() };
    /// let builder = ClassifierBuilder::new()
    ///     .with_runtime_config(config);
    /// ```
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Loads the model from bytes already held in memory
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - A model is already set
    ///   - The bytes are not a valid model
    ///   - The model structure is invalid
    pub fn with_model_bytes(mut self, model_bytes: &[u8]) -> Result<Self, ClassifierError> {
        self.ensure_no_model()?;
        let engine = OnnxEngine::load(model_bytes, &self.runtime_config).map_err(|e| {
            error!("Failed to load model: {}", e);
            e
        })?;
        self.engine = Some(Arc::new(engine));
        Ok(self)
    }

    /// Loads the model from an ONNX file
    ///
    /// # Example
    /// ```no_run
    /// use qa_chatbot::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .with_model_file("assets/qa_model.onnx");
    /// ```
    pub fn with_model_file(mut self, model_path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let model_path = model_path.as_ref();
        if model_path.as_os_str().is_empty() {
            return Err(ClassifierError::BuildError("Model path cannot be empty".to_string()));
        }
        self.ensure_no_model()?;
        if !model_path.exists() {
            return Err(ClassifierError::ModelLoadError(format!(
                "Model file not found: {}",
                model_path.display()
            )));
        }

        let engine = OnnxEngine::load_file(model_path, &self.runtime_config).map_err(|e| {
            error!("Failed to load model from {}: {}", model_path.display(), e);
            e
        })?;
        self.model_path = Some(model_path.to_string_lossy().to_string());
        self.engine = Some(Arc::new(engine));
        Ok(self)
    }

    /// Uses an already constructed engine, e.g. a different runtime or a test double
    pub fn with_engine(mut self, engine: impl InferenceEngine + 'static) -> Result<Self, ClassifierError> {
        self.ensure_no_model()?;
        self.engine = Some(Arc::new(engine));
        Ok(self)
    }

    /// Chooses where the label mapping is read from
    pub fn with_label_source(mut self, source: LabelMappingSource) -> Self {
        self.label_source = Some(source);
        self
    }

    /// Sets what happens when the label mapping cannot be loaded
    pub fn with_mapping_policy(mut self, policy: MappingFailurePolicy) -> Self {
        self.mapping_policy = policy;
        self
    }

    /// Builds and returns the final Classifier instance
    ///
    /// # Returns
    /// * `Result<Classifier, ClassifierError>` - The constructed Classifier if successful, or an error if:
    ///   - No model has been loaded
    ///   - No label source has been chosen
    ///   - The label mapping failed to load under [`MappingFailurePolicy::Fail`]
    ///
    /// # Example
    /// ```no_run
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use qa_chatbot::{ClassifierBuilder, LabelMappingSource};
    ///
    /// let classifier = ClassifierBuilder::new()
    ///     .with_model_file("assets/qa_model.onnx")?
    ///     .with_label_source(LabelMappingSource::model_metadata())
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Classifier, ClassifierError> {
        let engine = self.engine
            .ok_or_else(|| ClassifierError::BuildError("A model must be loaded before building".to_string()))?;
        let label_source = self.label_source
            .ok_or_else(|| ClassifierError::BuildError("A label mapping source must be set".to_string()))?;

        let label_mapping = label_source.build(engine.as_ref(), self.mapping_policy)?;
        info!("Classifier ready with {} labels", label_mapping.len());

        Ok(Classifier {
            model_path: self.model_path,
            engine,
            label_mapping: Arc::new(label_mapping),
            label_source,
        })
    }

    fn ensure_no_model(&self) -> Result<(), ClassifierError> {
        if self.engine.is_some() {
            return Err(ClassifierError::BuildError("Model already set".to_string()));
        }
        Ok(())
    }
}
