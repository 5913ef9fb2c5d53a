//! The AI-Sheets server: in-memory workbooks persisted as .xlsx files.

pub mod files;
pub mod table;
pub mod tools;

use crate::config::SheetsConfig;
use crate::engine::outcome::{DocumentKind, Note, ToolError, ToolOutput, ToolResult, non_empty};
use crate::engine::registry::Registry;
use crate::engine::run_blocking;
use crate::engine::server::DocumentServer;
use files::{check_sheet_name, read_table, write_table, write_workbook};
use rmcp::model::{JsonObject, Tool};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use table::Table;
use tokio::sync::Mutex;
use tools::{
    AddSheetArgs, CreateWorkbookArgs, ReadExcelArgs, SaveWorkbookArgs, SheetCall, SheetTool,
    TestSimpleArgs, WriteExcelArgs,
};
use tracing::{info, warn};

const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// An open workbook: named sheets in insertion order plus its save target.
#[derive(Debug, Clone)]
pub struct Workbook {
    sheets: Vec<(String, Table)>,
    path: PathBuf,
}

impl Workbook {
    pub fn new(path: PathBuf) -> Self {
        Self {
            sheets: Vec::new(),
            path,
        }
    }

    /// Insert a sheet, or replace the table of an existing sheet in place.
    ///
    /// Sheet names compare case-insensitively, as they do inside an xlsx
    /// file; a replaced sheet keeps its original spelling and tab position.
    /// Returns the name the sheet is stored under.
    pub fn upsert_sheet(&mut self, name: &str, table: Table) -> &str {
        let index = match self.sheets.iter().position(|(n, _)| same_sheet(n, name)) {
            Some(index) => {
                self.sheets[index].1 = table;
                index
            }
            None => {
                self.sheets.push((name.to_string(), table));
                self.sheets.len() - 1
            }
        };
        &self.sheets[index].0
    }

    pub fn sheet(&self, name: &str) -> Option<&Table> {
        self.sheets
            .iter()
            .find(|(n, _)| same_sheet(n, name))
            .map(|(_, t)| t)
    }

    pub fn sheets(&self) -> &[(String, Table)] {
        &self.sheets
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_path(&mut self, path: PathBuf) {
        self.path = path;
    }

    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(|(_, t)| t.len()).sum()
    }
}

fn same_sheet(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Shared server state: configuration and the workbook registry.
///
/// The registry lock is held for the whole of each tool call, so calls are
/// applied one at a time in arrival order.
#[derive(Clone)]
pub struct SheetServer {
    config: Arc<SheetsConfig>,
    workbooks: Arc<Mutex<Registry<Workbook>>>,
}

impl SheetServer {
    pub fn new(config: SheetsConfig) -> Self {
        Self {
            config: Arc::new(config),
            workbooks: Arc::new(Mutex::new(Registry::new(DocumentKind::Workbook))),
        }
    }

    pub async fn handle(&self, name: &str, arguments: Option<JsonObject>) -> ToolResult {
        match SheetCall::parse(name, arguments)? {
            SheetCall::CreateWorkbook(args) => self.create_workbook(args).await,
            SheetCall::AddSheet(args) => self.add_sheet(args).await,
            SheetCall::SaveWorkbook(args) => self.save_workbook(args).await,
            SheetCall::WriteExcel(args) => self.write_excel(args).await,
            SheetCall::ReadExcel(args) => self.read_excel(args).await,
            SheetCall::TestSimple(args) => Ok(self.test_simple(args)),
        }
    }

    fn workbook_path(&self, dir: Option<&str>, filename: &str) -> PathBuf {
        let dir = dir.map(PathBuf::from).unwrap_or_else(|| self.config.default_dir.clone());
        dir.join(format!("{filename}.xlsx"))
    }

    // ───── Tool implementations ─────

    pub async fn create_workbook(&self, args: CreateWorkbookArgs) -> ToolResult {
        let path = self.workbook_path(non_empty(args.output_path).as_deref(), &args.filename);
        self.workbooks
            .lock()
            .await
            .create(&args.filename, Workbook::new(path.clone()));
        info!(workbook = %args.filename, path = %path.display(), "Created workbook");
        Ok(
            ToolOutput::new(format!("Workbook '{}' created", args.filename)).note(Note::Path {
                label: "Will be saved to",
                path,
            }),
        )
    }

    pub async fn add_sheet(&self, args: AddSheetArgs) -> ToolResult {
        let mut workbooks = self.workbooks.lock().await;
        let workbook = workbooks.require_mut(&args.filename)?;

        check_sheet_name(&args.sheet_name).map_err(|reason| ToolError::InvalidArguments {
            tool: "add_sheet",
            reason,
        })?;

        let table = Table::from_rows(args.data);
        let rows = table.len();
        let columns = table.columns();
        let sheet_name = workbook.upsert_sheet(&args.sheet_name, table).to_string();

        // The sheet stays in memory whether or not the save succeeds.
        let path = workbook.path().to_path_buf();
        let snapshot = workbook.sheets().to_vec();
        let target = path.clone();
        let autosave = match run_blocking(move || write_workbook(&target, &snapshot)).await {
            Ok(()) => Note::Path {
                label: "Auto-saved",
                path,
            },
            Err(e) => {
                warn!(workbook = %args.filename, error = %e, "Automatic save failed");
                Note::Warning(format!("Auto-save failed: {e}"))
            }
        };

        Ok(ToolOutput::new(format!(
            "Sheet '{sheet_name}' added to workbook '{}'",
            args.filename
        ))
        .note(Note::Stats(format!("{rows} rows, {} columns", columns.len())))
        .note(autosave)
        .details(json!({
            "filename": args.filename,
            "sheet_name": sheet_name,
            "rows_added": rows,
            "columns_added": columns.len(),
            "column_names": columns,
        })))
    }

    pub async fn save_workbook(&self, args: SaveWorkbookArgs) -> ToolResult {
        let mut workbooks = self.workbooks.lock().await;
        let workbook = workbooks.require_mut(&args.filename)?;
        if let Some(dir) = non_empty(args.output_path) {
            workbook.set_path(self.workbook_path(Some(&dir), &args.filename));
        }

        let path = workbook.path().to_path_buf();
        let snapshot = workbook.sheets().to_vec();
        let sheet_count = snapshot.len();
        let total_rows = workbook.total_rows();
        let target = path.clone();
        run_blocking(move || write_workbook(&target, &snapshot)).await?;

        info!(workbook = %args.filename, path = %path.display(), "Saved workbook");
        Ok(
            ToolOutput::new(format!("Workbook saved: {}", path.display())).note(Note::Stats(
                format!("{sheet_count} sheets, {total_rows} rows total"),
            )),
        )
    }

    /// Writes a file straight from the given rows; the registry is not involved.
    pub async fn write_excel(&self, args: WriteExcelArgs) -> ToolResult {
        let mut path = PathBuf::from(&args.file_path);
        if path.is_relative() {
            path = self.config.default_dir.join(path);
        }
        let sheet_name = args
            .sheet_name
            .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string());

        let table = Table::from_rows(args.data);
        let rows = table.len();
        let columns = table.columns();
        let target = path.clone();
        run_blocking(move || write_table(&target, &table, &sheet_name)).await?;

        info!(path = %path.display(), rows, "Wrote file");
        Ok(ToolOutput::new("File written successfully:").details(json!({
            "file_path": path.display().to_string(),
            "rows_written": rows,
            "columns_written": columns.len(),
            "column_names": columns,
        })))
    }

    /// Reads up to `max_rows` rows but previews only the first `preview_rows`.
    pub async fn read_excel(&self, args: ReadExcelArgs) -> ToolResult {
        let path = PathBuf::from(&args.file_path);
        let max_rows = args.max_rows.unwrap_or(self.config.read_max_rows);
        let sheet = args.sheet_name;
        let frame = run_blocking(move || read_table(&path, sheet.as_ref(), max_rows)).await?;

        Ok(ToolOutput::new("File read successfully:").details(json!({
            "rows": frame.rows.len(),
            "columns": frame.columns.len(),
            "column_names": frame.columns,
            "data": frame.records(self.config.preview_rows),
        })))
    }

    pub fn test_simple(&self, args: TestSimpleArgs) -> ToolOutput {
        ToolOutput::new(format!("Test succeeded! Message received: {}", args.message)).note(
            Note::Stats(format!("{} server connected and working!", Self::NAME)),
        )
    }

    /// Summary of every open workbook, for the documents resource.
    pub async fn list_workbooks(&self) -> Value {
        let workbooks = self.workbooks.lock().await;
        let items: Vec<Value> = workbooks
            .iter()
            .map(|(name, workbook)| {
                let sheets: Vec<Value> = workbook
                    .sheets()
                    .iter()
                    .map(|(sheet, table)| {
                        json!({
                            "name": sheet,
                            "rows": table.len(),
                            "columns": table.columns().len(),
                        })
                    })
                    .collect();
                json!({
                    "name": name,
                    "path": workbook.path().display().to_string(),
                    "sheets": sheets,
                })
            })
            .collect();
        Value::Array(items)
    }

    #[cfg(test)]
    async fn workbook(&self, name: &str) -> Option<Workbook> {
        self.workbooks.lock().await.get(name).cloned()
    }
}

impl DocumentServer for SheetServer {
    const NAME: &'static str = "AI-Sheets";
    const TITLE: &'static str = "AI-Sheets Excel Server";
    const SCHEME: &'static str = "sheets";
    const INSTRUCTIONS: &'static str = "Spreadsheet MCP server. \
        Create a workbook with create_workbook, then add sheets of JSON rows with add_sheet; \
        every add_sheet saves the whole workbook automatically. save_workbook writes it on demand \
        (optionally to a new directory). write_excel and read_excel work on files directly \
        without any workbook. Resources: sheets://documents lists open workbooks, \
        sheets://logs returns recent server logs.";

    fn tools(&self) -> Vec<Tool> {
        SheetTool::ALL.into_iter().map(SheetTool::describe).collect()
    }

    async fn call(&self, name: &str, arguments: Option<JsonObject>) -> ToolResult {
        self.handle(name, arguments).await
    }

    async fn documents(&self) -> Value {
        self.list_workbooks().await
    }
}
