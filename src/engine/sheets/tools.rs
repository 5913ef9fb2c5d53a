//! The AI-Sheets tool catalog and typed argument records.

use crate::engine::catalog::{mutating, object_schema, read_only, tool};
use crate::engine::outcome::{ToolError, parse_args};
use crate::engine::sheets::files::SheetSelector;
use crate::engine::sheets::table::Row;
use rmcp::model::{JsonObject, Tool};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetTool {
    CreateWorkbook,
    AddSheet,
    SaveWorkbook,
    WriteExcel,
    ReadExcel,
    TestSimple,
}

impl SheetTool {
    pub const ALL: [Self; 6] = [
        Self::CreateWorkbook,
        Self::AddSheet,
        Self::SaveWorkbook,
        Self::WriteExcel,
        Self::ReadExcel,
        Self::TestSimple,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::CreateWorkbook => "create_workbook",
            Self::AddSheet => "add_sheet",
            Self::SaveWorkbook => "save_workbook",
            Self::WriteExcel => "write_excel",
            Self::ReadExcel => "read_excel",
            Self::TestSimple => "test_simple",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn describe(self) -> Tool {
        let filename = json!({
            "type": "string",
            "description": "Workbook name (without the .xlsx extension)"
        });
        let rows = json!({
            "type": "array",
            "description": "Array of JSON objects; each object is a row and its keys are the columns",
            "items": { "type": "object" }
        });
        match self {
            Self::CreateWorkbook => tool(
                self.name(),
                "Create Workbook",
                "Create a new, empty workbook in memory",
                object_schema(
                    json!({
                        "filename": filename,
                        "output_path": {
                            "type": "string",
                            "description": "Directory to save into (optional, defaults to the Documents directory)"
                        }
                    }),
                    &["filename"],
                ),
                mutating(false),
            ),
            Self::AddSheet => tool(
                self.name(),
                "Add Sheet",
                "Add a sheet of rows to a workbook and save the workbook automatically",
                object_schema(
                    json!({
                        "filename": filename,
                        "sheet_name": { "type": "string", "description": "Sheet name" },
                        "data": rows
                    }),
                    &["filename", "sheet_name", "data"],
                ),
                mutating(true),
            ),
            Self::SaveWorkbook => tool(
                self.name(),
                "Save Workbook",
                "Save every sheet of a workbook to an .xlsx file",
                object_schema(
                    json!({
                        "filename": filename,
                        "output_path": {
                            "type": "string",
                            "description": "Directory to save into (optional)"
                        }
                    }),
                    &["filename"],
                ),
                mutating(true),
            ),
            Self::WriteExcel => tool(
                self.name(),
                "Write Excel File",
                "Write rows directly to an .xlsx or .csv file",
                object_schema(
                    json!({
                        "file_path": {
                            "type": "string",
                            "description": "Path of the file to create (.xlsx or .csv); relative paths go under the Documents directory"
                        },
                        "data": rows,
                        "sheet_name": {
                            "type": "string",
                            "description": "Sheet name (optional, defaults to Sheet1)"
                        }
                    }),
                    &["file_path", "data"],
                ),
                mutating(true),
            ),
            Self::ReadExcel => tool(
                self.name(),
                "Read Excel File",
                "Read a spreadsheet or csv file and return its shape and a preview of its rows",
                object_schema(
                    json!({
                        "file_path": {
                            "type": "string",
                            "description": "Path to the file (.xlsx, .xls, .csv)"
                        },
                        "sheet_name": {
                            "type": ["string", "integer"],
                            "description": "Sheet name or zero-based index (optional, first sheet by default)"
                        },
                        "max_rows": {
                            "type": "integer",
                            "description": "Maximum number of rows to read (default: 100)"
                        }
                    }),
                    &["file_path"],
                ),
                read_only(),
            ),
            Self::TestSimple => tool(
                self.name(),
                "Connection Test",
                "Simple test to check the MCP connection",
                object_schema(
                    json!({ "message": { "type": "string", "description": "Test message" } }),
                    &["message"],
                ),
                read_only(),
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkbookArgs {
    pub filename: String,
    #[serde(default)]
    pub output_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddSheetArgs {
    pub filename: String,
    pub sheet_name: String,
    pub data: Vec<Row>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveWorkbookArgs {
    pub filename: String,
    #[serde(default)]
    pub output_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WriteExcelArgs {
    pub file_path: String,
    pub data: Vec<Row>,
    #[serde(default)]
    pub sheet_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadExcelArgs {
    pub file_path: String,
    #[serde(default)]
    pub sheet_name: Option<SheetSelector>,
    #[serde(default)]
    pub max_rows: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestSimpleArgs {
    pub message: String,
}

/// A validated tool invocation.
#[derive(Debug, Clone)]
pub enum SheetCall {
    CreateWorkbook(CreateWorkbookArgs),
    AddSheet(AddSheetArgs),
    SaveWorkbook(SaveWorkbookArgs),
    WriteExcel(WriteExcelArgs),
    ReadExcel(ReadExcelArgs),
    TestSimple(TestSimpleArgs),
}

impl SheetCall {
    pub fn parse(name: &str, arguments: Option<JsonObject>) -> Result<Self, ToolError> {
        let tool = SheetTool::from_name(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        let name = tool.name();
        Ok(match tool {
            SheetTool::CreateWorkbook => Self::CreateWorkbook(parse_args(name, arguments)?),
            SheetTool::AddSheet => Self::AddSheet(parse_args(name, arguments)?),
            SheetTool::SaveWorkbook => Self::SaveWorkbook(parse_args(name, arguments)?),
            SheetTool::WriteExcel => Self::WriteExcel(parse_args(name, arguments)?),
            SheetTool::ReadExcel => Self::ReadExcel(parse_args(name, arguments)?),
            SheetTool::TestSimple => Self::TestSimple(parse_args(name, arguments)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::required_arguments;

    fn args(value: serde_json::Value) -> Option<JsonObject> {
        value.as_object().cloned()
    }

    #[test]
    fn catalog_names_and_required_arguments_are_stable() {
        let expected: [(&str, &[&str]); 6] = [
            ("create_workbook", &["filename"]),
            ("add_sheet", &["filename", "sheet_name", "data"]),
            ("save_workbook", &["filename"]),
            ("write_excel", &["file_path", "data"]),
            ("read_excel", &["file_path"]),
            ("test_simple", &["message"]),
        ];
        for (tool, (name, required)) in SheetTool::ALL.into_iter().zip(expected) {
            let described = tool.describe();
            assert_eq!(described.name, name);
            assert_eq!(required_arguments(&described), required);
            assert_eq!(SheetTool::from_name(name), Some(tool));
        }
    }

    #[test]
    fn unknown_tool_is_rejected() {
        let err = SheetCall::parse("delete_workbook", None).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(ref n) if n == "delete_workbook"));
    }

    #[test]
    fn data_must_be_a_list_of_objects() {
        let err = SheetCall::parse(
            "add_sheet",
            args(json!({ "filename": "b", "sheet_name": "S", "data": { "a": 1 } })),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { tool: "add_sheet", .. }));

        let err = SheetCall::parse(
            "write_excel",
            args(json!({ "file_path": "x.csv", "data": [1, 2] })),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { tool: "write_excel", .. }));
    }

    #[test]
    fn read_excel_accepts_sheet_index() {
        let call = SheetCall::parse(
            "read_excel",
            args(json!({ "file_path": "x.xlsx", "sheet_name": 2, "max_rows": 5 })),
        )
        .unwrap();
        match call {
            SheetCall::ReadExcel(a) => {
                assert_eq!(a.sheet_name, Some(SheetSelector::Index(2)));
                assert_eq!(a.max_rows, Some(5));
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }
}
