use async_trait::async_trait;

use crate::buffer::{ConfidenceBuffer, PixelBuffer};
use crate::error::CutoutError;

/// Boundary to the external segmentation model.
///
/// Implementations are a black box to the pipeline and may be swapped
/// without touching thresholding or compositing. A call resolves exactly
/// once: either a confidence buffer covering every input pixel, or a
/// failure with a human-readable cause. No partial or streaming results.
#[async_trait]
pub trait SegmentationProvider: Send + Sync {
    async fn segment(&self, pixels: &PixelBuffer) -> Result<ConfidenceBuffer, CutoutError>;
}
