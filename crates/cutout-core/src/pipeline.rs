use std::time::Instant;

use crate::buffer::{CutoutResult, PixelBuffer};
use crate::composite::composite;
use crate::error::CutoutError;
use crate::events::{EventSink, PipelineEvent, PipelineEventType};
use crate::provider::SegmentationProvider;
use crate::threshold::threshold;

/// Runs one request through segment → threshold → composite.
pub async fn remove_background(
    provider: &dyn SegmentationProvider,
    original: &PixelBuffer,
    cutoff: f32,
) -> Result<CutoutResult, CutoutError> {
    remove_background_with_events(provider, original, cutoff, "request", None).await
}

/// Like [`remove_background`], but reports progress to an optional sink.
///
/// Each call emits `RequestStart` followed by exactly one of
/// `RequestSuccess` / `RequestError`; on failure no output buffer exists
/// and the caller keeps showing the unprocessed original. The request
/// owns all four buffers, so concurrent calls never share state.
pub async fn remove_background_with_events(
    provider: &dyn SegmentationProvider,
    original: &PixelBuffer,
    cutoff: f32,
    request: &str,
    events: Option<&dyn EventSink>,
) -> Result<CutoutResult, CutoutError> {
    // Reject a bad cutoff before paying for the model call.
    if !(0.0..=1.0).contains(&cutoff) {
        return Err(CutoutError::InvalidCutoff(cutoff));
    }

    let start = Instant::now();
    if let Some(sink) = events {
        sink.emit(PipelineEvent {
            event_type: PipelineEventType::RequestStart,
            request: request.to_string(),
            duration_ms: None,
            detail: None,
        });
    }

    match run_stages(provider, original, cutoff).await {
        Ok(result) => {
            if let Some(sink) = events {
                sink.emit(PipelineEvent {
                    event_type: PipelineEventType::RequestSuccess,
                    request: request.to_string(),
                    duration_ms: Some(start.elapsed().as_millis() as u64),
                    detail: None,
                });
            }
            Ok(result)
        }
        Err(err) => {
            match &err {
                CutoutError::DimensionMismatch(cause) => {
                    tracing::error!(%request, %cause, "provider violated the buffer contract");
                }
                other => {
                    tracing::warn!(%request, error = %other, "request failed");
                }
            }
            if let Some(sink) = events {
                sink.emit(PipelineEvent {
                    event_type: PipelineEventType::RequestError,
                    request: request.to_string(),
                    duration_ms: Some(start.elapsed().as_millis() as u64),
                    detail: Some(err.to_string()),
                });
            }
            Err(err)
        }
    }
}

async fn run_stages(
    provider: &dyn SegmentationProvider,
    original: &PixelBuffer,
    cutoff: f32,
) -> Result<CutoutResult, CutoutError> {
    let confidence = provider.segment(original).await?;
    if confidence.width() != original.width() || confidence.height() != original.height() {
        return Err(CutoutError::DimensionMismatch(format!(
            "provider returned a {}x{} confidence buffer for a {}x{} image",
            confidence.width(),
            confidence.height(),
            original.width(),
            original.height()
        )));
    }
    let mask = threshold(&confidence, cutoff)?;
    composite(original, &mask)
}
