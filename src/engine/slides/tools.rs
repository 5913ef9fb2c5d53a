//! The PowerPoint-Creator tool catalog and typed argument records.

use crate::engine::catalog::{mutating, object_schema, tool};
use crate::engine::outcome::{ToolError, parse_args};
use rmcp::model::{JsonObject, Tool};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideTool {
    CreatePresentation,
    AddTitleSlide,
    AddContentSlide,
    AddImageSlide,
    SavePresentation,
}

impl SlideTool {
    pub const ALL: [Self; 5] = [
        Self::CreatePresentation,
        Self::AddTitleSlide,
        Self::AddContentSlide,
        Self::AddImageSlide,
        Self::SavePresentation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::CreatePresentation => "create_presentation",
            Self::AddTitleSlide => "add_title_slide",
            Self::AddContentSlide => "add_content_slide",
            Self::AddImageSlide => "add_image_slide",
            Self::SavePresentation => "save_presentation",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn describe(self) -> Tool {
        let filename = json!({
            "type": "string",
            "description": "Presentation name (without the .pptx extension)"
        });
        let title = json!({ "type": "string", "description": "Slide title" });
        match self {
            Self::CreatePresentation => tool(
                self.name(),
                "Create Presentation",
                "Create a new, empty PowerPoint presentation",
                object_schema(
                    json!({
                        "title": { "type": "string", "description": "Presentation title" },
                        "filename": filename
                    }),
                    &["title", "filename"],
                ),
                mutating(false),
            ),
            Self::AddTitleSlide => tool(
                self.name(),
                "Add Title Slide",
                "Add a title slide to the presentation",
                object_schema(
                    json!({
                        "filename": filename,
                        "title": title,
                        "subtitle": { "type": "string", "description": "Subtitle (optional)" }
                    }),
                    &["filename", "title"],
                ),
                mutating(false),
            ),
            Self::AddContentSlide => tool(
                self.name(),
                "Add Content Slide",
                "Add a slide with a title and a bulleted list",
                object_schema(
                    json!({
                        "filename": filename,
                        "title": title,
                        "content": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "Bullet points, in order"
                        }
                    }),
                    &["filename", "title", "content"],
                ),
                mutating(false),
            ),
            Self::AddImageSlide => tool(
                self.name(),
                "Add Image Slide",
                "Add a slide with a title, an image and an optional caption",
                object_schema(
                    json!({
                        "filename": filename,
                        "title": title,
                        "image_path": {
                            "type": "string",
                            "description": "Path to the image (png, jpeg, gif, bmp, tiff)"
                        },
                        "caption": { "type": "string", "description": "Image caption (optional)" }
                    }),
                    &["filename", "title", "image_path"],
                ),
                mutating(false),
            ),
            Self::SavePresentation => tool(
                self.name(),
                "Save Presentation",
                "Save the presentation as a .pptx file",
                object_schema(
                    json!({
                        "filename": filename,
                        "output_path": {
                            "type": "string",
                            "description": "Output directory (optional, defaults to the current directory)"
                        }
                    }),
                    &["filename"],
                ),
                mutating(true),
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePresentationArgs {
    pub title: String,
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddTitleSlideArgs {
    pub filename: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddContentSlideArgs {
    pub filename: String,
    pub title: String,
    pub content: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddImageSlideArgs {
    pub filename: String,
    pub title: String,
    pub image_path: String,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavePresentationArgs {
    pub filename: String,
    #[serde(default)]
    pub output_path: Option<String>,
}

/// A validated tool invocation.
#[derive(Debug, Clone)]
pub enum SlideCall {
    CreatePresentation(CreatePresentationArgs),
    AddTitleSlide(AddTitleSlideArgs),
    AddContentSlide(AddContentSlideArgs),
    AddImageSlide(AddImageSlideArgs),
    SavePresentation(SavePresentationArgs),
}

impl SlideCall {
    pub fn parse(name: &str, arguments: Option<JsonObject>) -> Result<Self, ToolError> {
        let tool = SlideTool::from_name(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        let name = tool.name();
        Ok(match tool {
            SlideTool::CreatePresentation => Self::CreatePresentation(parse_args(name, arguments)?),
            SlideTool::AddTitleSlide => Self::AddTitleSlide(parse_args(name, arguments)?),
            SlideTool::AddContentSlide => Self::AddContentSlide(parse_args(name, arguments)?),
            SlideTool::AddImageSlide => Self::AddImageSlide(parse_args(name, arguments)?),
            SlideTool::SavePresentation => Self::SavePresentation(parse_args(name, arguments)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::required_arguments;

    #[test]
    fn catalog_names_and_required_arguments_are_stable() {
        let expected: [(&str, &[&str]); 5] = [
            ("create_presentation", &["title", "filename"]),
            ("add_title_slide", &["filename", "title"]),
            ("add_content_slide", &["filename", "title", "content"]),
            ("add_image_slide", &["filename", "title", "image_path"]),
            ("save_presentation", &["filename"]),
        ];
        for (tool, (name, required)) in SlideTool::ALL.into_iter().zip(expected) {
            let described = tool.describe();
            assert_eq!(described.name, name);
            assert_eq!(required_arguments(&described), required);
        }
    }

    #[test]
    fn content_must_be_a_list_of_strings() {
        let err = SlideCall::parse(
            "add_content_slide",
            json!({ "filename": "d", "title": "t", "content": "one" })
                .as_object()
                .cloned(),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { tool: "add_content_slide", .. }));
    }

    #[test]
    fn missing_arguments_are_rejected() {
        let err = SlideCall::parse("create_presentation", None).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
        let err = SlideCall::parse("add_video_slide", None).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(_)));
    }
}
