use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// File name of the packaged classification model
pub const DEFAULT_MODEL_FILE: &str = "qa_model.onnx";
/// File name of the packaged side-car label mapping
pub const DEFAULT_LABEL_MAPPING_FILE: &str = "label_mapping.json";

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Hash mismatch: expected {expected}, got {actual} for {file_type} file")]
    HashMismatch {
        file_type: String,
        expected: String,
        actual: String,
    },
}

/// Locates the resources packaged with the chatbot: the model artifact and its label mapping.
#[derive(Debug, Clone)]
pub struct AssetStore {
    assets_dir: PathBuf,
}

impl AssetStore {
    /// Creates an AssetStore rooted at the default assets directory
    pub fn new_default() -> Self {
        Self::new(Self::get_default_assets_dir())
    }

    /// Returns the default assets directory path
    pub fn get_default_assets_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var("QA_CHATBOT_ASSETS") {
            return PathBuf::from(path);
        }

        // 2. Use platform-specific data directory
        if let Some(data_dir) = dirs::data_dir() {
            return data_dir.join("qa-chatbot").join("assets");
        }

        // 3. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".local").join("share").join("qa-chatbot").join("assets");
        }

        // 4. Last resort: relative to the working directory
        PathBuf::from("assets")
    }

    pub fn new<P: AsRef<Path>>(assets_dir: P) -> Self {
        Self {
            assets_dir: assets_dir.as_ref().to_path_buf(),
        }
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    /// Resolves a packaged file name; absolute paths are returned unchanged
    pub fn get_path(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.assets_dir.join(path)
        }
    }

    pub fn get_model_path(&self) -> PathBuf {
        self.get_path(DEFAULT_MODEL_FILE)
    }

    pub fn get_label_mapping_path(&self) -> PathBuf {
        self.get_path(DEFAULT_LABEL_MAPPING_FILE)
    }

    pub fn has_asset(&self, name: &str) -> bool {
        let path = self.get_path(name);
        log::debug!("Checking asset {:?} (exists: {})", path, path.exists());
        path.exists()
    }

    /// Reads a model artifact fully into memory
    pub fn read_model(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.get_path(name);
        if !path.exists() {
            return Err(AssetError::NotFound(path));
        }
        let bytes = fs::read(&path)?;
        log::info!("Read {} bytes of model from {:?}", bytes.len(), path);
        Ok(bytes)
    }

    /// Reads a model artifact and checks it against an expected SHA-256 digest
    pub fn read_verified_model(&self, name: &str, expected_hash: &str) -> Result<Vec<u8>, AssetError> {
        let bytes = self.read_model(name)?;
        let actual = sha256_hex(&bytes);
        if !actual.eq_ignore_ascii_case(expected_hash) {
            log::error!("model hash mismatch: expected {}, got {}", expected_hash, actual);
            return Err(AssetError::HashMismatch {
                file_type: "model".to_string(),
                expected: expected_hash.to_string(),
                actual,
            });
        }
        log::info!("Model hash verified");
        Ok(bytes)
    }

    pub fn verify_file(&self, name: &str, expected_hash: &str) -> Result<bool, AssetError> {
        let path = self.get_path(name);
        log::info!("Verifying file: {:?}", path);
        if !path.exists() {
            return Ok(false);
        }
        let bytes = fs::read(&path)?;
        Ok(sha256_hex(&bytes).eq_ignore_ascii_case(expected_hash))
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
