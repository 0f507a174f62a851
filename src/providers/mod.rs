//! Classifier implementations.

pub mod onnx_classifier;
pub mod traits;

pub use onnx_classifier::{OnnxClassifier, OnnxClassifierOptions, softmax};
pub use traits::Classifier;
