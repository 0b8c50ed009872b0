use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineEventType {
    RequestStart,
    RequestSuccess,
    RequestError,
}

/// One event per pipeline transition. Every started request produces
/// exactly one terminal event (success or error), which is what a shell
/// driving a busy indicator keys off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEvent {
    pub event_type: PipelineEventType,
    pub request: String,
    pub duration_ms: Option<u64>,
    pub detail: Option<String>,
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: PipelineEvent);
}
