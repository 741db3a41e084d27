//! Image decoding and encoding.

use crate::canvas::Canvas;
use common::Size;
use std::io::Cursor;
use thiserror::Error;

/// Image decoder.
#[derive(Debug)]
pub struct ImageDecoder {
    /// Maximum image dimensions.
    max_width: u32,
    max_height: u32,
    /// Maximum memory usage.
    max_memory: usize,
}

impl ImageDecoder {
    /// Create a new image decoder.
    pub fn new() -> Self {
        Self {
            max_width: 4096,
            max_height: 4096,
            max_memory: 64 * 1024 * 1024, // 64MB
        }
    }

    /// Set maximum dimensions.
    pub fn set_max_dimensions(&mut self, width: u32, height: u32) {
        self.max_width = width;
        self.max_height = height;
    }

    /// Set maximum memory.
    pub fn set_max_memory(&mut self, bytes: usize) {
        self.max_memory = bytes;
    }

    /// Decode an image from bytes into an RGBA canvas.
    pub fn decode(&self, data: &[u8]) -> Result<Canvas, ImageError> {
        let format = image::guess_format(data).map_err(|_| ImageError::UnknownFormat)?;

        let reader = image::ImageReader::with_format(Cursor::new(data), format);
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| ImageError::DecodingError(e.to_string()))?;
        self.check_dimensions(width, height)?;

        let img = image::load_from_memory_with_format(data, format)
            .map_err(|e| ImageError::DecodingError(e.to_string()))?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        tracing::trace!(width, height, ?format, "decoded image");
        Canvas::from_rgba(width, height, rgba.into_raw())
    }

    fn check_dimensions(&self, width: u32, height: u32) -> Result<(), ImageError> {
        if width > self.max_width || height > self.max_height {
            return Err(ImageError::DimensionsTooLarge {
                width,
                height,
                max_width: self.max_width,
                max_height: self.max_height,
            });
        }

        let memory = Size::new(width, height).area() * 4;
        if memory > self.max_memory {
            return Err(ImageError::MemoryLimitExceeded {
                required: memory,
                limit: self.max_memory,
            });
        }

        Ok(())
    }
}

impl Default for ImageDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a canvas as PNG.
pub fn encode_png(canvas: &Canvas) -> Result<Vec<u8>, ImageError> {
    let buffer = image::RgbaImage::from_raw(canvas.width(), canvas.height(), canvas.data().to_vec())
        .ok_or(ImageError::InvalidBuffer {
            expected: canvas.width() as usize * canvas.height() as usize * 4,
            actual: canvas.data().len(),
        })?;

    let mut out = Cursor::new(Vec::new());
    buffer
        .write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| ImageError::EncodingError(e.to_string()))?;
    Ok(out.into_inner())
}

/// Image decoding error.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Unknown image format")]
    UnknownFormat,

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Pixel buffer has {actual} bytes, expected {expected}")]
    InvalidBuffer { expected: usize, actual: usize },

    #[error("Image dimensions too large: {width}x{height} (max: {max_width}x{max_height})")]
    DimensionsTooLarge {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },

    #[error("Memory limit exceeded: required {required} bytes, limit is {limit} bytes")]
    MemoryLimitExceeded { required: usize, limit: usize },
}
