//! Public types for the classification pipeline.

mod label;
mod prediction;
mod recipe;
mod tensor;

pub use label::{ClassLabel, DEFAULT_LABELS, LabelSet, humanize};
pub use prediction::{Prediction, PredictionResult};
pub use recipe::{DATA_NOT_AVAILABLE, RECIPE_NOT_ADDED, RecipeRecord};
pub use tensor::{CHANNELS, ImageTensor};
