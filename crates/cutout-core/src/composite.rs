use crate::buffer::{AlphaMask, CutoutResult, PixelBuffer, BYTES_PER_PIXEL};
use crate::error::CutoutError;

/// Gates the original pixels through the mask: RGB channels are copied
/// unchanged, alpha becomes 255 where the mask is opaque and 0 where it
/// is transparent. Destination-in restricted to the alpha channel —
/// colors are never blended, and mask edges stay hard-stepped.
///
/// The input buffer is not mutated; the result is a new, independently
/// owned buffer.
pub fn composite(original: &PixelBuffer, mask: &AlphaMask) -> Result<CutoutResult, CutoutError> {
    if original.width() != mask.width() || original.height() != mask.height() {
        return Err(CutoutError::DimensionMismatch(format!(
            "pixel buffer is {}x{} but alpha mask is {}x{}",
            original.width(),
            original.height(),
            mask.width(),
            mask.height()
        )));
    }
    if original.data().len() != original.pixel_count() * BYTES_PER_PIXEL {
        return Err(CutoutError::DimensionMismatch(format!(
            "pixel buffer declares {} pixels but holds {} bytes",
            original.pixel_count(),
            original.data().len()
        )));
    }
    if mask.opaque().len() != original.pixel_count() {
        return Err(CutoutError::DimensionMismatch(format!(
            "alpha mask declares {} pixels but holds {} entries",
            original.pixel_count(),
            mask.opaque().len()
        )));
    }

    let mut data = original.data().to_vec();
    for (i, &opaque) in mask.opaque().iter().enumerate() {
        data[i * BYTES_PER_PIXEL + 3] = if opaque { 255 } else { 0 };
    }
    PixelBuffer::from_rgba(original.width(), original.height(), data)
}
