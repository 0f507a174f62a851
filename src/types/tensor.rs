//! Batched image tensor fed to the classifier.

/// Colour channels per pixel (RGB).
pub const CHANNELS: usize = 3;

/// A single preprocessed image in NHWC layout with a batch dimension of 1.
///
/// Values are `f32` in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    data: Vec<f32>,
    height: usize,
    width: usize,
}

impl ImageTensor {
    /// Wrap raw NHWC data. Returns `None` when the length does not match the shape.
    pub fn from_raw(height: usize, width: usize, data: Vec<f32>) -> Option<Self> {
        (data.len() == height * width * CHANNELS).then_some(Self {
            data,
            height,
            width,
        })
    }

    /// All-zero tensor of the given spatial size.
    pub fn zeros(height: usize, width: usize) -> Self {
        Self {
            data: vec![0.0; height * width * CHANNELS],
            height,
            width,
        }
    }

    /// Shape as `[batch, height, width, channels]`.
    pub fn shape(&self) -> [usize; 4] {
        [1, self.height, self.width, CHANNELS]
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_checks_length() {
        assert!(ImageTensor::from_raw(2, 2, vec![0.0; 12]).is_some());
        assert!(ImageTensor::from_raw(2, 2, vec![0.0; 11]).is_none());
    }

    #[test]
    fn zeros_has_batch_dimension() {
        let tensor = ImageTensor::zeros(224, 224);
        assert_eq!(tensor.shape(), [1, 224, 224, 3]);
        assert_eq!(tensor.as_slice().len(), 224 * 224 * 3);
    }
}
