//! Builder for configuring pipeline instances

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use super::PredictionPipeline;
use crate::model::{Device, ModelSource};
use crate::preprocess::{ImagePreprocessor, ResizeFilter};
use crate::providers::{Classifier, OnnxClassifier, OnnxClassifierOptions};
use crate::recipes::RecipeStore;
use crate::types::LabelSet;
use crate::{CookError, Result};

const DEFAULT_INPUT_SIZE: (u32, u32) = (224, 224);

/// Builder for [`PredictionPipeline`].
///
/// Either a model source or a ready [`Classifier`] must be supplied, plus a
/// recipe store or a path to one. Labels default to [`LabelSet::default`].
#[derive(Default)]
pub struct PipelineBuilder {
    model: Option<ModelSource>,
    classifier: Option<Arc<dyn Classifier>>,
    input_size: Option<(u32, u32)>,
    filter: ResizeFilter,
    labels: Option<LabelSet>,
    recipes: Option<Arc<RecipeStore>>,
    recipes_path: Option<PathBuf>,
    output_name: Option<String>,
    apply_softmax: bool,
    device: Device,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the classifier from this ONNX artifact.
    pub fn model(mut self, source: ModelSource) -> Self {
        self.model = Some(source);
        self
    }

    /// Shorthand for a local ONNX file.
    pub fn model_path(self, path: impl Into<PathBuf>) -> Self {
        self.model(ModelSource::local(path))
    }

    /// Use an already constructed classifier instead of loading a model.
    pub fn classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Model input size as width and height.
    pub fn input_size(mut self, width: u32, height: u32) -> Self {
        self.input_size = Some((width, height));
        self
    }

    pub fn filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn labels(mut self, labels: LabelSet) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn recipes(mut self, store: RecipeStore) -> Self {
        self.recipes = Some(Arc::new(store));
        self
    }

    /// Load the recipe store from this JSON file at build time.
    pub fn recipes_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.recipes_path = Some(path.into());
        self
    }

    /// Name of the model output holding the class scores.
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Apply softmax to raw model output.
    pub fn apply_softmax(mut self, enabled: bool) -> Self {
        self.apply_softmax = enabled;
        self
    }

    pub fn device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Load every asset and validate the assembled pipeline.
    pub fn build(self) -> Result<PredictionPipeline> {
        let recipes = match (self.recipes, self.recipes_path) {
            (Some(store), _) => store,
            (None, Some(path)) => Arc::new(RecipeStore::load(&path)?),
            (None, None) => {
                return Err(CookError::Configuration(
                    "no recipe store configured".to_string(),
                ));
            }
        };

        let classifier: Arc<dyn Classifier> = match (self.classifier, self.model) {
            (Some(classifier), _) => classifier,
            (None, Some(source)) => {
                let path = source.resolve()?;
                let (input_width, input_height) = self.input_size.unwrap_or(DEFAULT_INPUT_SIZE);
                let classifier = OnnxClassifier::load(
                    &path,
                    OnnxClassifierOptions {
                        input_width,
                        input_height,
                        output_name: self.output_name,
                        apply_softmax: self.apply_softmax,
                        device: self.device,
                    },
                )?;
                info!(model = %source.describe(), device = self.device.name(), "model loaded");
                Arc::new(classifier)
            }
            (None, None) => {
                return Err(CookError::Configuration("no model configured".to_string()));
            }
        };

        let (width, height) = self.input_size.unwrap_or_else(|| classifier.input_size());
        let preprocessor = ImagePreprocessor::new(width, height)?.with_filter(self.filter);

        PredictionPipeline::new(
            preprocessor,
            classifier,
            self.labels.unwrap_or_default(),
            recipes,
        )
    }
}
