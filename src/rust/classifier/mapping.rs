use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;

use super::engine::InferenceEngine;
use super::error::ClassifierError;

/// Metadata key under which a model artifact embeds its label mapping
pub const LABEL_MAPPING_KEY: &str = "label_mapping";

/// An immutable lookup from label index (as a decimal string) to answer text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "HashMap<String, Value>")]
pub struct LabelMapping(HashMap<String, String>);

impl LabelMapping {
    /// Parses a flat JSON object such as `{"0": "Paris", "1": "London"}`.
    ///
    /// The document must be an object. Non-string values are kept in
    /// their JSON text form, so `{"1": 5}` maps `"1"` to `"5"`.
    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        serde_json::from_str(json)
            .map_err(|e| ClassifierError::MappingSourceError(format!("Invalid label mapping JSON: {}", e)))
    }

    pub fn resolve(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Known label keys, sorted numerically where possible
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.0.keys().cloned().collect();
        keys.sort_by(|a, b| match (a.parse::<i64>(), b.parse::<i64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => a.cmp(b),
        });
        keys
    }
}

impl From<HashMap<String, String>> for LabelMapping {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl From<HashMap<String, Value>> for LabelMapping {
    fn from(map: HashMap<String, Value>) -> Self {
        let entries = map
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(text) => (key, text),
                other => (key, other.to_string()),
            })
            .collect();
        Self(entries)
    }
}

/// What a session does when its label mapping cannot be loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MappingFailurePolicy {
    /// Log a warning and continue with an empty mapping
    #[default]
    Degrade,
    /// Refuse to build the session
    Fail,
}

/// Where a session gets its label mapping from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelMappingSource {
    /// A JSON file packaged next to the model
    File(PathBuf),
    /// A JSON string stored in the model's custom metadata
    ModelMetadata { key: String },
}

impl LabelMappingSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Reads the mapping from the model's `label_mapping` metadata entry
    pub fn model_metadata() -> Self {
        Self::ModelMetadata { key: LABEL_MAPPING_KEY.to_string() }
    }

    /// Loads the mapping, reporting any failure.
    ///
    /// # Errors
    /// - `MappingSourceError` if the file is unreadable or the JSON is invalid
    /// - `MappingNotFoundError` if the model has no entry under the metadata key
    pub fn load(&self, engine: &dyn InferenceEngine) -> Result<LabelMapping, ClassifierError> {
        match self {
            Self::File(path) => load_file(path),
            Self::ModelMetadata { key } => {
                let json = engine.custom_metadata(key)?.ok_or_else(|| {
                    ClassifierError::MappingNotFoundError(format!("Model metadata has no '{}' entry", key))
                })?;
                LabelMapping::from_json(&json)
            }
        }
    }

    /// Loads the mapping and applies `policy` to failures.
    ///
    /// Under [`MappingFailurePolicy::Degrade`] a failure yields an empty
    /// mapping, so every lookup misses.
    pub fn build(
        &self,
        engine: &dyn InferenceEngine,
        policy: MappingFailurePolicy,
    ) -> Result<LabelMapping, ClassifierError> {
        match self.load(engine) {
            Ok(mapping) => {
                info!("Loaded {} labels from {}", mapping.len(), self);
                Ok(mapping)
            }
            Err(e) => match policy {
                MappingFailurePolicy::Degrade => {
                    warn!("{}; continuing with an empty label mapping", e);
                    Ok(LabelMapping::default())
                }
                MappingFailurePolicy::Fail => Err(e),
            },
        }
    }
}

impl fmt::Display for LabelMappingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::ModelMetadata { key } => write!(f, "model metadata '{}'", key),
        }
    }
}

fn load_file(path: &Path) -> Result<LabelMapping, ClassifierError> {
    let json = fs::read_to_string(path).map_err(|e| {
        ClassifierError::MappingSourceError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    LabelMapping::from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::LabelIndex;

    #[derive(Debug)]
    struct MetadataOnly(Option<String>);

    impl InferenceEngine for MetadataOnly {
        fn input_name(&self) -> &str {
            "text"
        }

        fn predict(&self, _input: &str) -> Result<LabelIndex, ClassifierError> {
            Ok(LabelIndex(0))
        }

        fn custom_metadata(&self, key: &str) -> Result<Option<String>, ClassifierError> {
            assert_eq!(key, LABEL_MAPPING_KEY);
            Ok(self.0.clone())
        }
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("qa-chatbot-mapping-tests");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_resolve_known_and_unknown() {
        let mapping = LabelMapping::from_json(r#"{"0":"Paris","1":"London"}"#).unwrap();
        assert_eq!(mapping.resolve("0"), Some("Paris"));
        assert_eq!(mapping.resolve("1"), Some("London"));
        assert_eq!(mapping.resolve("2"), None);
    }

    #[test]
    fn test_sparse_keys_sorted_numerically() {
        let mapping = LabelMapping::from_json(r#"{"10":"ten","2":"two","7":"seven"}"#).unwrap();
        assert_eq!(mapping.keys(), vec!["2", "7", "10"]);
    }

    #[test]
    fn test_non_string_values_are_coerced() {
        let mapping = LabelMapping::from_json(r#"{"0":"Yes","1":5,"2":true,"3":1.5}"#).unwrap();
        assert_eq!(mapping.len(), 4);
        assert_eq!(mapping.resolve("0"), Some("Yes"));
        assert_eq!(mapping.resolve("1"), Some("5"));
        assert_eq!(mapping.resolve("2"), Some("true"));
        assert_eq!(mapping.resolve("3"), Some("1.5"));
    }

    #[test]
    fn test_rejects_non_object_documents() {
        let err = LabelMapping::from_json("[\"a\"]").unwrap_err();
        assert!(matches!(err, ClassifierError::MappingSourceError(_)));
        assert!(LabelMapping::from_json("\"Yes\"").is_err());
    }

    #[test]
    fn test_file_source() {
        let path = temp_file("labels.json", r#"{"0":"No","1":"Yes"}"#);
        let mapping = LabelMappingSource::file(&path).load(&MetadataOnly(None)).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.resolve("1"), Some("Yes"));
    }

    #[test]
    fn test_missing_file_is_source_error() {
        let source = LabelMappingSource::file("/nonexistent/label_mapping.json");
        let err = source.load(&MetadataOnly(None)).unwrap_err();
        assert!(matches!(err, ClassifierError::MappingSourceError(_)));
    }

    #[test]
    fn test_malformed_file_degrades() {
        let path = temp_file("broken.json", "{not json");
        let source = LabelMappingSource::file(&path);
        let mapping = source.build(&MetadataOnly(None), MappingFailurePolicy::Degrade).unwrap();
        assert!(mapping.is_empty());

        let err = source.build(&MetadataOnly(None), MappingFailurePolicy::Fail).unwrap_err();
        assert!(err.is_mapping_error());
    }

    #[test]
    fn test_metadata_source() {
        let engine = MetadataOnly(Some(r#"{"0":"Yes"}"#.to_string()));
        let mapping = LabelMappingSource::model_metadata().load(&engine).unwrap();
        assert_eq!(mapping.resolve("0"), Some("Yes"));
    }

    #[test]
    fn test_metadata_key_absent() {
        let source = LabelMappingSource::model_metadata();
        let err = source.load(&MetadataOnly(None)).unwrap_err();
        assert!(matches!(err, ClassifierError::MappingNotFoundError(_)));

        let mapping = source.build(&MetadataOnly(None), MappingFailurePolicy::Degrade).unwrap();
        assert!(mapping.is_empty());
    }
}
