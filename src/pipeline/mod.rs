//! Prediction pipeline: preprocess → classify → recipe lookup.
//!
//! The pipeline owns handles to the classifier and recipe store, both built
//! once at startup and shared read-only afterwards. Every front-end calls
//! [`PredictionPipeline::predict`]; none re-derives the steps.

mod builder;

pub use builder::PipelineBuilder;

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::preprocess::ImagePreprocessor;
use crate::providers::Classifier;
use crate::recipes::RecipeStore;
use crate::telemetry;
use crate::types::{
    ClassLabel, DATA_NOT_AVAILABLE, ImageTensor, LabelSet, Prediction, PredictionResult,
    RECIPE_NOT_ADDED, RecipeRecord,
};
use crate::{CookError, Result};

/// The inference-and-recipe-lookup pipeline.
pub struct PredictionPipeline {
    preprocessor: ImagePreprocessor,
    classifier: Arc<dyn Classifier>,
    labels: LabelSet,
    recipes: Arc<RecipeStore>,
}

impl std::fmt::Debug for PredictionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionPipeline")
            .field("preprocessor", &self.preprocessor)
            .field("classifier", &self.classifier.name())
            .field("labels", &self.labels)
            .field("recipes", &self.recipes.len())
            .finish()
    }
}

impl PredictionPipeline {
    /// Create a builder for configuring the pipeline.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Assemble a pipeline and validate it against the classifier.
    ///
    /// Runs one warm-up inference on an all-zero tensor and fails with
    /// [`CookError::LabelMismatch`] when the output width differs from the
    /// label count. Label *order* cannot be checked.
    pub fn new(
        preprocessor: ImagePreprocessor,
        classifier: Arc<dyn Classifier>,
        labels: LabelSet,
        recipes: Arc<RecipeStore>,
    ) -> Result<Self> {
        if preprocessor.input_size() != classifier.input_size() {
            let (pw, ph) = preprocessor.input_size();
            let (cw, ch) = classifier.input_size();
            return Err(CookError::Configuration(format!(
                "preprocessor targets {pw}x{ph} but classifier '{}' expects {cw}x{ch}",
                classifier.name()
            )));
        }

        let (width, height) = preprocessor.input_size();
        let outputs = classifier
            .infer(&ImageTensor::zeros(height as usize, width as usize))?
            .len();
        if outputs != labels.len() {
            return Err(CookError::LabelMismatch {
                labels: labels.len(),
                outputs,
            });
        }

        let missing = recipes.missing(&labels);
        if !missing.is_empty() {
            tracing::warn!(?missing, "labels without recipe entries will use placeholders");
        }

        info!(
            classifier = classifier.name(),
            labels = labels.len(),
            recipes = recipes.len(),
            "prediction pipeline ready"
        );

        Ok(Self {
            preprocessor,
            classifier,
            labels,
            recipes,
        })
    }

    /// Classify an uploaded image and join the result with its recipe.
    pub fn predict(&self, image: &[u8]) -> Result<PredictionResult> {
        let start = Instant::now();
        let result = self.predict_inner(image);

        let (label, status) = match &result {
            Ok(r) => (r.label.clone(), "ok"),
            Err(_) => ("none".to_string(), "error"),
        };
        metrics::counter!(telemetry::PREDICTIONS_TOTAL,
            "label" => label,
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::PREDICTION_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());

        result
    }

    fn predict_inner(&self, image: &[u8]) -> Result<PredictionResult> {
        let tensor = self.preprocessor.preprocess(image)?;
        let (prediction, probabilities) = self.classify_tensor(&tensor)?;

        let record = self.recipes.lookup(&prediction.label.id);
        if record.is_empty() {
            metrics::counter!(telemetry::RECIPE_MISSES_TOTAL,
                "label" => prediction.label.id.clone(),
            )
            .increment(1);
        }

        debug!(
            label = %prediction.label.id,
            confidence = prediction.confidence,
            "prediction complete"
        );

        Ok(join_recipe(&prediction, record, probabilities))
    }

    /// Run the classifier on an already preprocessed tensor and pick the top class.
    pub fn classify(&self, tensor: &ImageTensor) -> Result<Prediction> {
        self.classify_tensor(tensor).map(|(prediction, _)| prediction)
    }

    fn classify_tensor(&self, tensor: &ImageTensor) -> Result<(Prediction, Vec<f32>)> {
        let distribution = self.classifier.infer(tensor)?;
        if distribution.len() != self.labels.len() {
            return Err(CookError::InvalidOutput(format!(
                "expected {} scores, got {}",
                self.labels.len(),
                distribution.len()
            )));
        }

        let (index, confidence) = argmax(&distribution).ok_or_else(|| {
            CookError::InvalidOutput("distribution has no comparable values".to_string())
        })?;
        let label = self.labels.get(index).ok_or_else(|| {
            CookError::InvalidOutput(format!("index {index} outside the label set"))
        })?;

        Ok((Prediction { label, confidence }, distribution))
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn recipes(&self) -> &RecipeStore {
        &self.recipes
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }
}

/// Index and value of the largest entry.
///
/// The lowest index wins exact ties; NaN entries are never selected.
/// Returns `None` for an empty or all-NaN slice.
pub fn argmax(distribution: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in distribution.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if value <= top => {}
            _ => best = Some((index, value)),
        }
    }
    best
}

/// Combine a prediction with its recipe, substituting placeholders for missing fields.
pub fn join_recipe(
    prediction: &Prediction,
    record: &RecipeRecord,
    probabilities: Vec<f32>,
) -> PredictionResult {
    let ClassLabel { id, .. } = &prediction.label;
    PredictionResult {
        label: id.clone(),
        display_name: record
            .name
            .clone()
            .unwrap_or_else(|| prediction.label.humanized()),
        confidence: prediction.confidence,
        calories: record
            .calories
            .clone()
            .unwrap_or_else(|| DATA_NOT_AVAILABLE.to_string()),
        ingredients: record
            .ingredients
            .clone()
            .unwrap_or_else(|| DATA_NOT_AVAILABLE.to_string()),
        instructions: record
            .instructions
            .clone()
            .unwrap_or_else(|| RECIPE_NOT_ADDED.to_string()),
        probabilities,
    }
}
