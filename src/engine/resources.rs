//! MCP Resources: server logs and the open-document listing.

use chrono::Utc;
use rmcp::model::{
    Annotated, ListResourcesResult, RawResource, ReadResourceResult, Resource, ResourceContents,
};
use serde_json::Value;
use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// Captured log lines, oldest first.
pub type LogBuffer = Arc<Mutex<VecDeque<String>>>;

pub fn new_log_buffer(capacity: usize) -> LogBuffer {
    Arc::new(Mutex::new(VecDeque::with_capacity(capacity)))
}

pub const LOG_BUFFER_CAPACITY: usize = 500;
const MAX_LINE_CHARS: usize = 400;

// ───── Log capture ─────

/// Mirrors tracing events into a bounded [`LogBuffer`] for the logs resource.
///
/// Lines read `<timestamp> <LEVEL> <target>: <message> | key=value ...`.
pub struct LogCaptureLayer {
    buffer: LogBuffer,
    capacity: usize,
}

impl LogCaptureLayer {
    pub fn new(buffer: LogBuffer, capacity: usize) -> Self {
        Self { buffer, capacity }
    }
}

impl<S: Subscriber> Layer<S> for LogCaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut fields = LineFields::default();
        event.record(&mut fields);

        let mut line = format!(
            "{} {:<5} {}: {}",
            Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            meta.level(),
            meta.target(),
            fields.message
        );
        if !fields.pairs.is_empty() {
            line.push_str(" |");
            line.push_str(&fields.pairs);
        }

        let Ok(mut lines) = self.buffer.lock() else {
            return;
        };
        lines.push_back(clip(line));
        while lines.len() > self.capacity {
            lines.pop_front();
        }
    }
}

#[derive(Default)]
struct LineFields {
    message: String,
    pairs: String,
}

impl LineFields {
    fn push(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message.push_str(value),
            name => {
                let _ = write!(self.pairs, " {name}={value}");
            }
        }
    }
}

// Numbers and booleans fall through to `record_debug`.
impl Visit for LineFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, &format!("{value:?}"));
    }
}

fn clip(line: String) -> String {
    if line.chars().count() <= MAX_LINE_CHARS {
        return line;
    }
    let mut clipped: String = line.chars().take(MAX_LINE_CHARS - 1).collect();
    clipped.push('…');
    clipped
}

// ───── Resource implementations ─────

/// Resources each server exposes under its own URI scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Logs,
    Documents,
}

impl ResourceKind {
    const ALL: [Self; 2] = [Self::Logs, Self::Documents];

    fn path(self) -> &'static str {
        match self {
            Self::Logs => "logs",
            Self::Documents => "documents",
        }
    }

    pub fn uri(self, scheme: &str) -> String {
        format!("{scheme}://{}", self.path())
    }

    pub fn from_uri(scheme: &str, uri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.uri(scheme) == uri)
    }
}

pub fn list_resources_impl(scheme: &str, server_title: &str) -> ListResourcesResult {
    let logs = RawResource {
        uri: ResourceKind::Logs.uri(scheme),
        name: "Server Logs".to_string(),
        title: Some(format!("{server_title} Logs")),
        description: Some(format!(
            "Recent log entries from the {server_title} server. Returns the last {LOG_BUFFER_CAPACITY} log lines."
        )),
        mime_type: Some("text/plain".to_string()),
        size: None,
        icons: None,
        meta: None,
    };
    let documents = RawResource {
        uri: ResourceKind::Documents.uri(scheme),
        name: "Open Documents".to_string(),
        title: Some(format!("{server_title} Open Documents")),
        description: Some(
            "Documents currently held in memory, with their names and contents summary."
                .to_string(),
        ),
        mime_type: Some("application/json".to_string()),
        size: None,
        icons: None,
        meta: None,
    };
    let resources: Vec<Resource> = [logs, documents]
        .into_iter()
        .map(|raw| Annotated::new(raw, None))
        .collect();
    ListResourcesResult {
        meta: None,
        resources,
        next_cursor: None,
    }
}

pub fn read_logs(uri: &str, buffer: &LogBuffer) -> ReadResourceResult {
    let text = match buffer.lock() {
        Ok(buf) => buf.iter().cloned().collect::<Vec<_>>().join("\n"),
        Err(_) => "Error: could not read log buffer".to_string(),
    };
    text_contents(uri, "text/plain", text)
}

pub fn read_documents(uri: &str, documents: &Value) -> ReadResourceResult {
    let text = serde_json::to_string_pretty(documents).unwrap_or_else(|_| documents.to_string());
    text_contents(uri, "application/json", text)
}

fn text_contents(uri: &str, mime_type: &str, text: String) -> ReadResourceResult {
    ReadResourceResult {
        contents: vec![ResourceContents::TextResourceContents {
            uri: uri.to_string(),
            mime_type: Some(mime_type.to_string()),
            text,
            meta: None,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(capacity: usize, emit: impl FnOnce()) -> Vec<String> {
        use tracing_subscriber::layer::SubscriberExt;

        let buf = new_log_buffer(capacity);
        let subscriber =
            tracing_subscriber::registry().with(LogCaptureLayer::new(buf.clone(), capacity));
        tracing::subscriber::with_default(subscriber, emit);
        let lines = buf.lock().unwrap();
        lines.iter().cloned().collect()
    }

    #[test]
    fn captured_line_carries_level_target_message_and_fields() {
        let lines = capture(10, || {
            tracing::warn!(workbook = "report", error = "disk full", rows = 3, "Automatic save failed");
        });
        assert_eq!(lines.len(), 1);
        let (timestamp, rest) = lines[0].split_once(' ').unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok(), "{timestamp}");
        assert_eq!(
            rest,
            "WARN  office_mcp::engine::resources::tests: Automatic save failed \
             | workbook=report error=disk full rows=3"
        );
    }

    #[test]
    fn events_without_fields_have_no_separator() {
        let lines = capture(10, || tracing::info!("Saved workbook"));
        assert!(lines[0].ends_with("resources::tests: Saved workbook"), "{}", lines[0]);
    }

    #[test]
    fn buffer_keeps_only_the_newest_lines() {
        let lines = capture(2, || {
            for n in 0..3 {
                tracing::info!(n, "tick");
            }
        });
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("| n=1"));
        assert!(lines[1].ends_with("| n=2"));
        assert!(capture(0, || tracing::info!("dropped")).is_empty());
    }

    #[test]
    fn long_lines_are_clipped_on_char_boundaries() {
        let clipped = clip("x".repeat(600));
        assert_eq!(clipped.chars().count(), MAX_LINE_CHARS);
        assert!(clipped.ends_with('…'));

        let clipped = clip("\u{1F980}".repeat(600));
        assert_eq!(clipped.chars().count(), MAX_LINE_CHARS);

        assert_eq!(clip("short".into()), "short");
    }

    #[test]
    fn resource_uris_use_the_server_scheme() {
        assert_eq!(ResourceKind::Logs.uri("sheets"), "sheets://logs");
        assert_eq!(
            ResourceKind::from_uri("slides", "slides://documents"),
            Some(ResourceKind::Documents)
        );
        assert_eq!(ResourceKind::from_uri("slides", "sheets://logs"), None);

        let listed = list_resources_impl("slides", "PowerPoint Creator");
        let uris: Vec<&str> = listed.resources.iter().map(|r| r.raw.uri.as_str()).collect();
        assert_eq!(uris, ["slides://logs", "slides://documents"]);
    }

    #[test]
    fn read_logs_joins_buffered_lines() {
        let buf = new_log_buffer(4);
        buf.lock().unwrap().extend(["first".to_string(), "second".to_string()]);
        let result = read_logs("sheets://logs", &buf);
        match &result.contents[0] {
            ResourceContents::TextResourceContents { uri, text, .. } => {
                assert_eq!(uri, "sheets://logs");
                assert_eq!(text, "first\nsecond");
            }
            other => panic!("unexpected contents: {other:?}"),
        }
    }
}
