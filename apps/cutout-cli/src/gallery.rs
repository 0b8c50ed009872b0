use std::collections::HashSet;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use cutout_core::{
    remove_background_with_events, CutoutError, CutoutResult, EventSink, PixelBuffer,
    SegmentationProvider,
};

pub struct RequestOutcome {
    pub request: String,
    pub result: Result<CutoutResult, CutoutError>,
    pub elapsed_ms: u64,
}

/// Drives one independent pipeline request per scheduled image.
///
/// Each request owns its buffers and reports back over the channel with
/// exactly one message, success or failure, so the busy set empties on
/// every path. Scheduling the same request id twice while it is still in
/// flight is a no-op.
pub struct GalleryRunner {
    provider: Arc<dyn SegmentationProvider>,
    events: Option<Arc<dyn EventSink>>,
    in_flight: HashSet<String>,
    tx: mpsc::Sender<RequestOutcome>,
    rx: mpsc::Receiver<RequestOutcome>,
}

impl GalleryRunner {
    pub fn new(
        provider: Arc<dyn SegmentationProvider>,
        events: Option<Arc<dyn EventSink>>,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            provider,
            events,
            in_flight: HashSet::new(),
            tx,
            rx,
        }
    }

    pub fn schedule(&mut self, request: String, original: PixelBuffer, cutoff: f32) {
        if !self.in_flight.insert(request.clone()) {
            return;
        }
        let provider = self.provider.clone();
        let events = self.events.clone();
        let tx = self.tx.clone();

        crate::rt().spawn(async move {
            let start = Instant::now();
            let result = remove_background_with_events(
                provider.as_ref(),
                &original,
                cutoff,
                &request,
                events.as_deref(),
            )
            .await;
            if let Err(err) = &result {
                tracing::warn!(%request, error = %err, "gallery request failed");
            }
            let _ = tx.send(RequestOutcome {
                request,
                result,
                elapsed_ms: start.elapsed().as_millis() as u64,
            });
        });
    }

    pub fn is_busy(&self, request: &str) -> bool {
        self.in_flight.contains(request)
    }

    /// Blocks for the next completed request; `None` once nothing is in
    /// flight.
    pub fn wait_next(&mut self) -> Option<RequestOutcome> {
        if self.in_flight.is_empty() {
            return None;
        }
        let outcome = self.rx.recv().ok()?;
        self.in_flight.remove(&outcome.request);
        Some(outcome)
    }
}
