//! Prediction outcomes.

use serde::{Deserialize, Serialize};

use super::label::ClassLabel;

/// The top class of a probability distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: ClassLabel,
    /// Maximum value of the distribution.
    pub confidence: f32,
}

/// One inference outcome joined with recipe metadata.
///
/// Every text field is already resolved: missing recipe data has been
/// replaced with placeholders and a missing name with the humanized label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Raw class identifier.
    pub label: String,
    pub display_name: String,
    /// In `[0, 1]`.
    pub confidence: f32,
    pub calories: String,
    pub ingredients: String,
    pub instructions: String,
    /// Full distribution, ordered like the label set.
    pub probabilities: Vec<f32>,
}

impl PredictionResult {
    /// Labels and probabilities of the `k` most likely classes, highest first.
    ///
    /// Ties keep label order.
    pub fn top_k<'a>(&self, labels: &'a [String], k: usize) -> Vec<(&'a str, f32)> {
        let mut ranked: Vec<(&'a str, f32)> = labels
            .iter()
            .map(String::as_str)
            .zip(self.probabilities.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);
        ranked
    }
}
