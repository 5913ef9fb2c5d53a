//! Structured tool results and their rendering at the MCP boundary.
//!
//! Handlers never build response text themselves: they return a
//! [`ToolResult`], and [`render`] turns it into the marker-prefixed message
//! clients see (`✅ ...` on success, `❌ ...` on failure).

use rmcp::model::{CallToolResult, Content, JsonObject};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub const SUCCESS_MARKER: &str = "✅";
pub const FAILURE_MARKER: &str = "❌";

pub type ToolResult = Result<ToolOutput, ToolError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Workbook,
    Presentation,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Workbook => f.write_str("Workbook"),
            Self::Presentation => f.write_str("Presentation"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Error: {kind} '{name}' not found. Create it first.")]
    UnknownDocument { kind: DocumentKind, name: String },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Error: invalid arguments for '{tool}': {reason}")]
    InvalidArguments { tool: &'static str, reason: String },

    #[error("Error: file '{}' does not exist.", .0.display())]
    MissingFile(PathBuf),

    #[error("Error: unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Error: {context}: {message}")]
    Failed { context: String, message: String },
}

impl ToolError {
    pub fn unknown_document(kind: DocumentKind, name: &str) -> Self {
        Self::UnknownDocument {
            kind,
            name: name.to_string(),
        }
    }

    pub fn failed(context: &str, err: impl fmt::Display) -> Self {
        Self::Failed {
            context: context.to_string(),
            message: err.to_string(),
        }
    }
}

/// A line of supplementary information below the headline.
#[derive(Debug, Clone, PartialEq)]
pub enum Note {
    /// Counts and sizes.
    Stats(String),
    /// Where a document was (or will be) written.
    Path { label: &'static str, path: PathBuf },
    /// Something went wrong without failing the operation.
    Warning(String),
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stats(text) => write!(f, "📊 {text}"),
            Self::Path { label, path } => write!(f, "💾 {label}: {}", path.display()),
            Self::Warning(text) => write!(f, "⚠️ {text}"),
        }
    }
}

/// Successful outcome of a tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub headline: String,
    pub notes: Vec<Note>,
    pub details: Option<Value>,
}

impl ToolOutput {
    pub fn new(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            notes: Vec::new(),
            details: None,
        }
    }

    pub fn note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    pub fn details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Render a handler result as the text message sent back to the client.
pub fn render_text(result: &ToolResult) -> String {
    match result {
        Ok(output) => {
            let mut text = format!("{SUCCESS_MARKER} {}", output.headline);
            for note in &output.notes {
                text.push('\n');
                text.push_str(&note.to_string());
            }
            if let Some(details) = &output.details {
                let json = serde_json::to_string_pretty(details).unwrap_or_else(|_| details.to_string());
                text.push_str("\n\n");
                text.push_str(&json);
            }
            text
        }
        Err(err) => format!("{FAILURE_MARKER} {err}"),
    }
}

/// Convert a handler result into an MCP tool result.
///
/// Failures are still delivered as content (with `is_error` set) so that a
/// handler error never surfaces as a protocol-level error.
pub fn render(result: ToolResult) -> CallToolResult {
    let text = render_text(&result);
    match result {
        Ok(_) => CallToolResult::success(vec![Content::text(text)]),
        Err(_) => CallToolResult::error(vec![Content::text(text)]),
    }
}

/// Deserialize a tool's argument record into its typed form.
pub fn parse_args<T: DeserializeOwned>(
    tool: &'static str,
    arguments: Option<JsonObject>,
) -> Result<T, ToolError> {
    let value = Value::Object(arguments.unwrap_or_default());
    serde_json::from_value(value).map_err(|e| ToolError::InvalidArguments {
        tool,
        reason: e.to_string(),
    })
}

/// Treat empty optional strings the same as absent ones.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Args {
        filename: String,
        #[serde(default)]
        data: Vec<String>,
    }

    #[test]
    fn render_success_includes_notes_and_details() {
        let output = ToolOutput::new("Workbook saved")
            .note(Note::Stats("2 sheets, 5 rows total".into()))
            .details(serde_json::json!({ "rows": 5 }));
        let text = render_text(&Ok(output));
        assert!(text.starts_with("✅ Workbook saved\n📊 2 sheets"));
        assert!(text.ends_with("{\n  \"rows\": 5\n}"));
    }

    #[test]
    fn render_failure_sets_error_flag() {
        let result = render(Err(ToolError::UnknownTool("bogus".into())));
        assert_eq!(result.is_error, Some(true));
        let text = &result.content[0].as_text().expect("text content").text;
        assert_eq!(text, "❌ Unknown tool: bogus");
    }

    #[test]
    fn parse_args_reports_shape_errors() {
        let mut args = JsonObject::new();
        args.insert("filename".into(), "book".into());
        args.insert("data".into(), "not a list".into());
        let err = parse_args::<Args>("add_sheet", Some(args)).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { tool: "add_sheet", .. }));
    }

    #[test]
    fn parse_args_treats_missing_record_as_empty() {
        let err = parse_args::<Args>("add_sheet", None).unwrap_err();
        assert!(err.to_string().contains("filename"), "{err}");

        let mut args = JsonObject::new();
        args.insert("filename".into(), "book".into());
        let parsed: Args = parse_args("add_sheet", Some(args)).unwrap();
        assert_eq!(parsed.filename, "book");
        assert!(parsed.data.is_empty());
    }

    #[test]
    fn non_empty_drops_blank_strings() {
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("x".into())), Some("x".into()));
        assert_eq!(non_empty(None), None);
    }
}
