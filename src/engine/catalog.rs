//! Helpers for describing tools in the `tools/list` catalog.

use rmcp::model::{JsonObject, Tool, ToolAnnotations};
use serde_json::Value;
use std::sync::Arc;

/// Build a JSON-Schema object description from its properties and required keys.
pub fn object_schema(properties: Value, required: &[&str]) -> Arc<JsonObject> {
    Arc::new(
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
        .as_object()
        .cloned()
        .unwrap_or_default(),
    )
}

/// Annotations for tools that change server state or write files.
pub fn mutating(idempotent: bool) -> ToolAnnotations {
    ToolAnnotations::new()
        .read_only(false)
        .destructive(false)
        .idempotent(idempotent)
        .open_world(false)
}

pub fn read_only() -> ToolAnnotations {
    ToolAnnotations::new()
        .read_only(true)
        .destructive(false)
        .idempotent(true)
        .open_world(false)
}

pub fn tool(
    name: &'static str,
    title: &'static str,
    description: &'static str,
    input_schema: Arc<JsonObject>,
    annotations: ToolAnnotations,
) -> Tool {
    Tool {
        name: name.into(),
        title: Some(title.into()),
        description: Some(description.into()),
        input_schema,
        output_schema: None,
        annotations: Some(annotations),
        execution: None,
        icons: None,
        meta: None,
    }
}

/// The fields of the catalog that clients depend on: name and required arguments.
pub fn required_arguments(tool: &Tool) -> Vec<String> {
    tool.input_schema
        .get("required")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_schema_lists_required_keys() {
        let schema = object_schema(
            serde_json::json!({ "filename": { "type": "string" } }),
            &["filename"],
        );
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], serde_json::json!(["filename"]));
    }

    #[test]
    fn tool_carries_metadata() {
        let t = tool(
            "create_workbook",
            "Create Workbook",
            "Create an empty workbook",
            object_schema(serde_json::json!({}), &["filename"]),
            mutating(false),
        );
        assert_eq!(t.name, "create_workbook");
        assert_eq!(required_arguments(&t), ["filename"]);
        let annotations = t.annotations.expect("annotations");
        assert_eq!(annotations.read_only_hint, Some(false));
    }
}
