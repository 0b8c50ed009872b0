//! Mask-to-cutout compositing pipeline.
//!
//! The pipeline turns an RGBA pixel buffer plus a per-pixel segmentation
//! confidence buffer into a cutout: the foreground subject with the
//! background made fully transparent. Segmentation itself is delegated to
//! an opaque [`SegmentationProvider`]; this crate owns everything around
//! it — buffer contracts, thresholding, compositing, and per-request
//! orchestration.

mod buffer;
mod composite;
mod error;
mod events;
mod pipeline;
mod provider;
mod threshold;

pub use buffer::{AlphaMask, ConfidenceBuffer, CutoutResult, PixelBuffer, BYTES_PER_PIXEL};
pub use composite::composite;
pub use error::{CutoutError, ErrorCode, ErrorInfo};
pub use events::{EventSink, PipelineEvent, PipelineEventType};
pub use pipeline::{remove_background, remove_background_with_events};
pub use provider::SegmentationProvider;
pub use threshold::{threshold, DEFAULT_CONFIDENCE_CUTOFF};
