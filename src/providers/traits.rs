//! Classifier trait.
//!
//! The pipeline only depends on this trait, so the ONNX runtime can be
//! swapped for a stub in tests or another backend later.

use crate::Result;
use crate::types::ImageTensor;

/// An image classifier over a fixed, ordered set of classes.
///
/// Implementations are loaded once and shared read-only; `infer` must not
/// change observable state, so repeated calls with the same tensor return
/// the same distribution.
pub trait Classifier: Send + Sync {
    /// Classifier name for logging/debugging.
    fn name(&self) -> &str;

    /// Expected input size as `(width, height)`.
    fn input_size(&self) -> (u32, u32);

    /// Run inference on one batched image.
    ///
    /// Returns one non-negative score per class, in model output order.
    fn infer(&self, tensor: &ImageTensor) -> Result<Vec<f32>>;
}
