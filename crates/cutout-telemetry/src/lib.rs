use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use cutout_core::{EventSink, PipelineEvent};
use serde::Serialize;

/// Picks an event sink from `CUTOUT_EVENT_SINK` (`stdout` or `file`;
/// `file` additionally needs `CUTOUT_EVENT_FILE`). Returns `None` when
/// unset or unrecognized — events are opt-in.
pub fn sink_from_env() -> Option<Box<dyn EventSink>> {
    let mode = std::env::var("CUTOUT_EVENT_SINK").ok()?;
    match mode.trim().to_ascii_lowercase().as_str() {
        "stdout" => Some(Box::new(StdoutSink)),
        "file" => {
            let path = std::env::var("CUTOUT_EVENT_FILE")
                .ok()
                .filter(|v| !v.trim().is_empty())?;
            Some(Box::new(FileSink::new(PathBuf::from(path))))
        }
        _ => None,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventEnvelope {
    event_type: String,
    request: String,
    duration_ms: Option<u64>,
    detail: Option<String>,
}

impl From<&PipelineEvent> for EventEnvelope {
    fn from(event: &PipelineEvent) -> Self {
        Self {
            event_type: format!("{:?}", event.event_type),
            request: event.request.clone(),
            duration_ms: event.duration_ms,
            detail: event.detail.clone(),
        }
    }
}

pub struct StdoutSink;

impl EventSink for StdoutSink {
    fn emit(&self, event: PipelineEvent) {
        if let Ok(line) = serde_json::to_string(&EventEnvelope::from(&event)) {
            println!("{}", line);
        }
    }
}

pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn write_line(&self, line: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("creating event log parent directory")?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .context("opening event log file")?;
        writeln!(file, "{}", line).context("writing event line")?;
        Ok(())
    }
}

impl EventSink for FileSink {
    fn emit(&self, event: PipelineEvent) {
        if let Ok(line) = serde_json::to_string(&EventEnvelope::from(&event)) {
            let _ = self.write_line(&line);
        }
    }
}
