//! Luminance-heuristic segmentation provider.
//!
//! Stands in for a real selfie-segmentation model: per-pixel confidence
//! is simply the pixel's brightness mapped to [0.0, 1.0], so bright
//! subjects on dark backdrops separate cleanly. Self-contained, which
//! keeps the demo runnable without any model download.

use std::time::Duration;

use async_trait::async_trait;
use cutout_core::{ConfidenceBuffer, CutoutError, PixelBuffer, SegmentationProvider};

#[derive(Debug, Clone, Default)]
pub struct LumaProvider {
    latency: Option<Duration>,
}

impl LumaProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an artificial delay before each result, standing in for the
    /// unbounded, model-dependent wait of a real provider.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
        }
    }
}

#[async_trait]
impl SegmentationProvider for LumaProvider {
    async fn segment(&self, pixels: &PixelBuffer) -> Result<ConfidenceBuffer, CutoutError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let values = pixels
            .data()
            .chunks_exact(4)
            .map(|px| {
                let brightness = (px[0] as u16 + px[1] as u16 + px[2] as u16) / 3;
                brightness as f32 / 255.0
            })
            .collect();
        tracing::debug!(
            width = pixels.width(),
            height = pixels.height(),
            "luma segmentation complete"
        );
        ConfidenceBuffer::new(pixels.width(), pixels.height(), values)
    }
}
