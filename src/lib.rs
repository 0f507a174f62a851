//! letthemcook - food photo classification with recipe lookup
//!
//! An uploaded photo is decoded, resized to the model input size, scaled to
//! `[0, 1]` and run through an ONNX image classifier. The winning class is
//! joined with an entry from a JSON recipe database.
//!
//! The same [`PredictionPipeline`] backs both the JSON API and the browser
//! dashboard served by `cookd`, and can also be used directly:
//!
//! ```rust,no_run
//! use letthemcook::PredictionPipeline;
//!
//! fn main() -> letthemcook::Result<()> {
//!     let pipeline = PredictionPipeline::builder()
//!         .model_path("models/mobilenet_ft_5cls_final.onnx")
//!         .recipes_path("recipes_db.json")
//!         .build()?;
//!
//!     let image = std::fs::read("dinner.jpg")?;
//!     let result = pipeline.predict(&image)?;
//!     println!("{} ({:.2}%)", result.display_name, result.confidence * 100.0);
//!     Ok(())
//! }
//! ```

#[cfg(feature = "client")]
pub mod client;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod preprocess;
pub mod providers;
pub mod recipes;
#[cfg(any(feature = "server", feature = "client"))]
pub mod server;
pub mod telemetry;
pub mod types;
mod version;

pub use error::{CookError, Result};
pub use model::{Device, ModelSource};
pub use pipeline::{PipelineBuilder, PredictionPipeline};
pub use preprocess::{ImagePreprocessor, ResizeFilter};
pub use providers::{Classifier, OnnxClassifier, OnnxClassifierOptions};
pub use recipes::RecipeStore;
pub use version::{GIT_BRANCH, GIT_SHA, PKG_VERSION, git_dirty, version_string};

pub use types::{
    ClassLabel, ImageTensor, LabelSet, Prediction, PredictionResult, RecipeRecord,
};
