//! Local image classification via ONNX Runtime.
//!
//! Expects a single NHWC `f32` input of shape `[1, H, W, 3]` and a
//! `[1, num_classes]` output, which is what a Keras image classifier
//! exported with tf2onnx produces.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::TensorRef;
use tracing::debug;

use crate::error::{CookError, Result};
use crate::model::Device;
use crate::types::ImageTensor;

use super::traits::Classifier;

/// Options for loading an [`OnnxClassifier`].
#[derive(Debug, Clone)]
pub struct OnnxClassifierOptions {
    pub input_width: u32,
    pub input_height: u32,
    /// Output to read; the first model output when `None`.
    pub output_name: Option<String>,
    /// Apply softmax to the raw output (for artifacts that emit logits).
    pub apply_softmax: bool,
    pub device: Device,
}

impl Default for OnnxClassifierOptions {
    fn default() -> Self {
        Self {
            input_width: 224,
            input_height: 224,
            output_name: None,
            apply_softmax: false,
            device: Device::default(),
        }
    }
}

/// Image classifier backed by an ONNX Runtime session.
pub struct OnnxClassifier {
    // `Session::run` needs exclusive access.
    session: Mutex<Session>,
    name: String,
    output_name: String,
    input_size: (u32, u32),
    apply_softmax: bool,
    device: Device,
}

impl OnnxClassifier {
    /// Load a model artifact. Failure here is meant to be fatal to the caller.
    pub fn load(model_path: &Path, options: OnnxClassifierOptions) -> Result<Self> {
        let session = build_session(model_path, &options.device)?;

        let output_name = match options.output_name {
            Some(name) => name,
            None => session
                .outputs()
                .first()
                .map(|output| output.name().to_string())
                .ok_or_else(|| {
                    CookError::Configuration(format!(
                        "Model {} declares no outputs",
                        model_path.display()
                    ))
                })?,
        };

        let name = model_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("onnx")
            .to_string();

        debug!(model = %name, output = %output_name, device = options.device.name(), "ONNX session ready");

        Ok(Self {
            session: Mutex::new(session),
            name,
            output_name,
            input_size: (options.input_width, options.input_height),
            apply_softmax: options.apply_softmax,
            device: options.device,
        })
    }

    pub fn device(&self) -> Device {
        self.device
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_size(&self) -> (u32, u32) {
        self.input_size
    }

    fn infer(&self, tensor: &ImageTensor) -> Result<Vec<f32>> {
        let (width, height) = self.input_size;
        if tensor.width() != width as usize || tensor.height() != height as usize {
            return Err(CookError::InvalidInput(format!(
                "expected a {width}x{height} tensor, got {}x{}",
                tensor.width(),
                tensor.height()
            )));
        }

        let input = TensorRef::from_array_view((tensor.shape(), tensor.as_slice()))
            .map_err(|e| CookError::Inference(format!("Failed to create input tensor: {e}")))?;

        let mut session = lock_recovering(&self.session);

        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| CookError::Inference(format!("ONNX inference failed: {e}")))?;

        let output = outputs.get(self.output_name.as_str()).ok_or_else(|| {
            CookError::InvalidOutput(format!("No output named '{}'", self.output_name))
        })?;

        // Batch size is always 1, so the whole buffer is the distribution.
        let (_, scores) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| CookError::InvalidOutput(format!("Failed to extract scores: {e}")))?;

        if self.apply_softmax {
            Ok(softmax(scores))
        } else {
            Ok(scores.to_vec())
        }
    }
}

/// Lock a mutex, taking the guard back from a poisoned lock.
///
/// A panic mid-run leaves no partial state in the session.
fn lock_recovering<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Softmax function.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|x| x / sum).collect()
}

/// Build an ONNX session with the appropriate execution provider.
fn build_session(model_path: &Path, device: &Device) -> Result<Session> {
    let builder = Session::builder()
        .map_err(|e| CookError::Configuration(format!("Failed to create session builder: {e}")))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| CookError::Configuration(format!("Failed to set optimization level: {e}")))?;

    let builder = match device {
        Device::Cpu => builder,
        #[cfg(feature = "cuda")]
        Device::Cuda { device_id } => {
            use ort::execution_providers::CUDAExecutionProvider;
            builder
                .with_execution_providers([CUDAExecutionProvider::default()
                    .with_device_id(*device_id as i32)
                    .build()])
                .map_err(|e| CookError::Configuration(format!("Failed to configure CUDA: {e}")))?
        }
    };

    builder
        .commit_from_file(model_path)
        .map_err(|e| CookError::Configuration(format!("Failed to load ONNX model: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poisoned_lock_is_recovered() {
        let mutex = std::sync::Arc::new(Mutex::new(7u32));
        let poisoner = std::sync::Arc::clone(&mutex);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("inference panicked");
        })
        .join();

        assert!(mutex.is_poisoned());
        assert_eq!(*lock_recovering(&mutex), 7);
        *lock_recovering(&mutex) += 1;
        assert_eq!(*lock_recovering(&mutex), 8);
    }

    #[test]
    fn test_softmax() {
        let logits = vec![1.0, 2.0, 3.0];
        let probs = softmax(&logits);

        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);

        assert!(probs[2] > probs[1]);
        assert!(probs[1] > probs[0]);
    }

    #[test]
    fn softmax_is_shift_invariant() {
        let a = softmax(&[1.0, 2.0]);
        let b = softmax(&[1001.0, 1002.0]);
        assert!((a[0] - b[0]).abs() < 1e-6);
        assert!((a[1] - b[1]).abs() < 1e-6);
    }

    #[test]
    fn default_options_target_mobilenet_input() {
        let options = OnnxClassifierOptions::default();
        assert_eq!((options.input_width, options.input_height), (224, 224));
        assert!(!options.apply_softmax);
        assert_eq!(options.device, Device::Cpu);
    }

    #[test]
    fn missing_model_file_fails_to_load() {
        let result = OnnxClassifier::load(
            Path::new("/nonexistent/model.onnx"),
            OnnxClassifierOptions::default(),
        );
        assert!(matches!(result, Err(CookError::Configuration(_))));
    }
}
