//! Configuration loading for cookd.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.letthemcook/config.toml` (user)
//! 3. `/etc/letthemcook/config.toml` (system)
//!
//! When none of these exist the built-in defaults are used, which point at
//! `models/mobilenet_ft_5cls_final.onnx` and `recipes_db.json` relative to
//! the working directory.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::model::{Device, ModelSource};
use crate::pipeline::PipelineBuilder;
use crate::preprocess::ResizeFilter;
use crate::types::{DEFAULT_LABELS, LabelSet};
use crate::{CookError, Result};

/// Service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub recipes: RecipesConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:5000).
    #[serde(default = "default_address")]
    pub address: String,
    /// Maximum request body size in bytes (default: 10 MiB).
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,
    /// Allow cross-origin requests from any origin (default: true).
    #[serde(default = "default_true")]
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            max_upload_bytes: default_max_upload(),
            cors: true,
        }
    }
}

fn default_address() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_max_upload() -> usize {
    10 * 1024 * 1024
}

fn default_true() -> bool {
    true
}

/// Model artifact and label configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// ONNX artifact path (a file inside `hub_repo` when that is set).
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
    /// HuggingFace Hub repository holding the artifact (feature `hub`).
    #[serde(default)]
    pub hub_repo: Option<String>,
    #[serde(default = "default_input_dim")]
    pub input_width: u32,
    #[serde(default = "default_input_dim")]
    pub input_height: u32,
    /// Class identifiers in model output order.
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,
    /// One-identifier-per-line manifest; overrides `labels` when set.
    #[serde(default)]
    pub labels_path: Option<PathBuf>,
    #[serde(default)]
    pub output_name: Option<String>,
    #[serde(default)]
    pub apply_softmax: bool,
    #[serde(default)]
    pub filter: ResizeFilter,
    /// Device to use: "cpu" or "cuda" (default: "cpu").
    #[serde(default = "default_device")]
    pub device: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            hub_repo: None,
            input_width: default_input_dim(),
            input_height: default_input_dim(),
            labels: default_labels(),
            labels_path: None,
            output_name: None,
            apply_softmax: false,
            filter: ResizeFilter::default(),
            device: default_device(),
        }
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from("models/mobilenet_ft_5cls_final.onnx")
}

fn default_input_dim() -> u32 {
    224
}

fn default_labels() -> Vec<String> {
    DEFAULT_LABELS.iter().map(|s| s.to_string()).collect()
}

fn default_device() -> String {
    "cpu".to_string()
}

/// Recipe database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipesConfig {
    #[serde(default = "default_recipes_path")]
    pub path: PathBuf,
}

impl Default for RecipesConfig {
    fn default() -> Self {
        Self {
            path: default_recipes_path(),
        }
    }
}

fn default_recipes_path() -> PathBuf {
    PathBuf::from("recipes_db.json")
}

impl Config {
    /// Load configuration from the standard locations, falling back to defaults.
    ///
    /// An explicit path that does not exist is an error.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => {
                let content = fs::read_to_string(&path).map_err(|e| {
                    CookError::Configuration(format!("Failed to read config file {path:?}: {e}"))
                })?;
                let config = Self::from_toml_str(&content).map_err(|e| {
                    CookError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
                })?;
                info!(path = %path.display(), "configuration loaded");
                Ok(config)
            }
            None => {
                info!("no config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(CookError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".letthemcook").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/letthemcook/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Label set from the manifest file if configured, else the inline list.
    pub fn label_set(&self) -> Result<LabelSet> {
        match &self.model.labels_path {
            Some(path) => LabelSet::load(path),
            None => LabelSet::new(self.model.labels.iter().cloned()),
        }
    }

    /// Where to load the model artifact from.
    pub fn model_source(&self) -> Result<ModelSource> {
        match &self.model.hub_repo {
            None => Ok(ModelSource::local(&self.model.path)),
            #[cfg(feature = "hub")]
            Some(repo) => Ok(ModelSource::huggingface(
                repo.clone(),
                self.model.path.to_string_lossy().into_owned(),
            )),
            #[cfg(not(feature = "hub"))]
            Some(repo) => Err(CookError::Configuration(format!(
                "model.hub_repo = {repo:?} requires the `hub` feature"
            ))),
        }
    }

    /// Pipeline builder with every configured asset applied.
    pub fn pipeline_builder(&self) -> Result<PipelineBuilder> {
        let mut builder = PipelineBuilder::new()
            .model(self.model_source()?)
            .input_size(self.model.input_width, self.model.input_height)
            .filter(self.model.filter)
            .labels(self.label_set()?)
            .recipes_path(&self.recipes.path)
            .apply_softmax(self.model.apply_softmax)
            .device(Device::parse(&self.model.device)?);

        if let Some(ref name) = self.model.output_name {
            builder = builder.output_name(name.clone());
        }

        Ok(builder)
    }
}
