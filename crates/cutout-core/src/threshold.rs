use crate::buffer::{AlphaMask, ConfidenceBuffer};
use crate::error::CutoutError;

/// Empirical default; callers may override per request.
pub const DEFAULT_CONFIDENCE_CUTOFF: f32 = 0.4;

/// Converts per-pixel confidences into a binary alpha mask.
///
/// Strict greater-than: a confidence exactly equal to `cutoff` is
/// background. Pure and deterministic; the only failure modes are a
/// cutoff outside [0.0, 1.0] and a confidence buffer whose value count
/// does not match its declared dimensions (possible for buffers that
/// arrived through deserialization rather than [`ConfidenceBuffer::new`]).
pub fn threshold(confidence: &ConfidenceBuffer, cutoff: f32) -> Result<AlphaMask, CutoutError> {
    if !(0.0..=1.0).contains(&cutoff) {
        return Err(CutoutError::InvalidCutoff(cutoff));
    }
    if confidence.values().len() != confidence.pixel_count() {
        return Err(CutoutError::DimensionMismatch(format!(
            "confidence buffer declares {}x{} ({} pixels) but holds {} values",
            confidence.width(),
            confidence.height(),
            confidence.pixel_count(),
            confidence.values().len()
        )));
    }

    let opaque = confidence.values().iter().map(|&c| c > cutoff).collect();
    AlphaMask::new(confidence.width(), confidence.height(), opaque)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn confidence(values: Vec<f32>) -> ConfidenceBuffer {
        ConfidenceBuffer::new(values.len() as u32, 1, values).expect("valid confidence buffer")
    }

    #[test]
    fn strictly_greater_than_cutoff_is_opaque() {
        let mask = threshold(&confidence(vec![0.9, 0.1, 0.5, 0.39]), 0.4).expect("threshold");
        assert_eq!(mask.opaque(), &[true, false, true, false]);
    }

    #[test]
    fn value_exactly_at_cutoff_is_background() {
        let mask = threshold(&confidence(vec![0.4]), 0.4).expect("threshold");
        assert!(!mask.is_opaque(0));
    }

    #[test]
    fn boundary_cutoffs_are_accepted() {
        let buffer = confidence(vec![0.0, 1.0]);
        let all_fg = threshold(&buffer, 0.0).expect("cutoff 0.0");
        assert_eq!(all_fg.opaque(), &[false, true]);
        let all_bg = threshold(&buffer, 1.0).expect("cutoff 1.0");
        assert_eq!(all_bg.opaque(), &[false, false]);
    }

    #[test]
    fn out_of_range_cutoff_is_rejected() {
        let buffer = confidence(vec![0.5]);
        assert_eq!(
            threshold(&buffer, 1.5).unwrap_err(),
            CutoutError::InvalidCutoff(1.5)
        );
        assert!(matches!(
            threshold(&buffer, f32::NAN).unwrap_err(),
            CutoutError::InvalidCutoff(_)
        ));
    }
}
