//! Where the model artifact comes from.

use std::path::PathBuf;

use crate::{CookError, Result};

/// Source for the model artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Local file.
    Local { path: PathBuf },

    /// File inside a HuggingFace Hub repository, downloaded on first use.
    #[cfg(feature = "hub")]
    HuggingFace { repo_id: String, file: String },
}

impl ModelSource {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local { path: path.into() }
    }

    #[cfg(feature = "hub")]
    pub fn huggingface(repo_id: impl Into<String>, file: impl Into<String>) -> Self {
        Self::HuggingFace {
            repo_id: repo_id.into(),
            file: file.into(),
        }
    }

    /// Resolve to a local path, downloading if needed.
    pub fn resolve(&self) -> Result<PathBuf> {
        match self {
            Self::Local { path } => {
                if !path.is_file() {
                    return Err(CookError::Configuration(format!(
                        "Model file does not exist: {}",
                        path.display()
                    )));
                }
                Ok(path.clone())
            }
            #[cfg(feature = "hub")]
            Self::HuggingFace { repo_id, file } => {
                let api = hf_hub::api::sync::Api::new().map_err(|e| {
                    CookError::Configuration(format!("Failed to initialize HF API: {e}"))
                })?;
                api.model(repo_id.clone()).get(file).map_err(|e| {
                    CookError::Configuration(format!(
                        "Failed to download {file} from {repo_id}: {e}"
                    ))
                })
            }
        }
    }

    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Local { path } => path.display().to_string(),
            #[cfg(feature = "hub")]
            Self::HuggingFace { repo_id, file } => format!("hf://{repo_id}/{file}"),
        }
    }
}
