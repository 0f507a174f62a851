//! Image decoding and normalization.
//!
//! Turns uploaded bytes into the NHWC `[1, H, W, 3]` tensor the classifier
//! expects: decode, convert to RGB, resize to the exact target size without
//! preserving aspect ratio, then scale bytes into `[0, 1]`.

use std::io::Read;

use image::imageops::{self, FilterType};
use serde::Deserialize;

use crate::types::ImageTensor;
use crate::{CookError, Result};

/// Resampling filter used when resizing to the model input size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    /// Matches the Keras `load_img` default.
    #[default]
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Decodes and normalizes images to a fixed spatial size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagePreprocessor {
    width: u32,
    height: u32,
    filter: ResizeFilter,
}

impl ImagePreprocessor {
    /// Create a preprocessor targeting `width` x `height`.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CookError::Configuration(format!(
                "model input size must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            filter: ResizeFilter::default(),
        })
    }

    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Target size as `(width, height)`.
    pub fn input_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Decode `bytes` and produce a normalized tensor.
    ///
    /// Fails with [`CookError::Decode`] when the bytes are not a supported image.
    pub fn preprocess(&self, bytes: &[u8]) -> Result<ImageTensor> {
        let decoded = image::load_from_memory(bytes)?;
        let rgb = decoded.to_rgb8();

        let resized = if rgb.dimensions() == (self.width, self.height) {
            rgb
        } else {
            imageops::resize(&rgb, self.width, self.height, self.filter.into())
        };

        let data: Vec<f32> = resized
            .into_raw()
            .into_iter()
            .map(|v| f32::from(v) / 255.0)
            .collect();

        ImageTensor::from_raw(self.height as usize, self.width as usize, data).ok_or_else(|| {
            CookError::Decode("resized buffer does not match the target shape".to_string())
        })
    }

    /// Read an entire stream and preprocess it.
    pub fn preprocess_reader<R: Read>(&self, mut reader: R) -> Result<ImageTensor> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.preprocess(&bytes)
    }
}
