use serde::{Deserialize, Serialize};

use crate::error::CutoutError;

pub const BYTES_PER_PIXEL: usize = 4;

/// Interleaved RGBA pixel buffer. `data.len()` is always
/// `width * height * 4`; channel order is fixed for the lifetime of the
/// buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// A cutout is an ordinary pixel buffer whose alpha channel has been
/// replaced by the mask verdict, the way a matte is just a flat value
/// sequence.
pub type CutoutResult = PixelBuffer;

impl PixelBuffer {
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CutoutError> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(CutoutError::DimensionMismatch(format!(
                "pixel buffer declares {}x{} ({} bytes) but holds {} bytes",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// RGBA channels of the pixel at row-major index `i`.
    pub fn rgba_at(&self, i: usize) -> [u8; 4] {
        let base = i * BYTES_PER_PIXEL;
        [
            self.data[base],
            self.data[base + 1],
            self.data[base + 2],
            self.data[base + 3],
        ]
    }
}

/// Per-pixel foreground confidence in [0.0, 1.0], row-major, matching the
/// pixel order of the buffer it was produced from. Produced once by a
/// segmentation provider and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBuffer {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl ConfidenceBuffer {
    pub fn new(width: u32, height: u32, values: Vec<f32>) -> Result<Self, CutoutError> {
        let expected = width as usize * height as usize;
        if values.len() != expected {
            return Err(CutoutError::DimensionMismatch(format!(
                "confidence buffer declares {}x{} ({} pixels) but holds {} values",
                width,
                height,
                expected,
                values.len()
            )));
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

/// Binary opaque/transparent verdict per pixel, derived deterministically
/// from a confidence buffer and a cutoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    opaque: Vec<bool>,
}

impl AlphaMask {
    pub fn new(width: u32, height: u32, opaque: Vec<bool>) -> Result<Self, CutoutError> {
        let expected = width as usize * height as usize;
        if opaque.len() != expected {
            return Err(CutoutError::DimensionMismatch(format!(
                "alpha mask declares {}x{} ({} pixels) but holds {} entries",
                width,
                height,
                expected,
                opaque.len()
            )));
        }
        Ok(Self {
            width,
            height,
            opaque,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn opaque(&self) -> &[bool] {
        &self.opaque
    }

    pub fn is_opaque(&self, i: usize) -> bool {
        self.opaque[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_buffer_rejects_truncated_data() {
        let err = PixelBuffer::from_rgba(2, 2, vec![0u8; 15]).unwrap_err();
        assert!(matches!(err, CutoutError::DimensionMismatch(_)));
    }

    #[test]
    fn pixel_buffer_accepts_exact_length() {
        let buffer = PixelBuffer::from_rgba(2, 2, vec![7u8; 16]).expect("valid buffer");
        assert_eq!(buffer.pixel_count(), 4);
        assert_eq!(buffer.rgba_at(3), [7, 7, 7, 7]);
    }

    #[test]
    fn confidence_buffer_rejects_wrong_length() {
        let err = ConfidenceBuffer::new(3, 3, vec![0.5; 8]).unwrap_err();
        assert!(matches!(err, CutoutError::DimensionMismatch(_)));
    }

    #[test]
    fn alpha_mask_rejects_wrong_length() {
        let err = AlphaMask::new(2, 2, vec![true; 5]).unwrap_err();
        assert!(matches!(err, CutoutError::DimensionMismatch(_)));
    }
}
