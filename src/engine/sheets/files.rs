//! Spreadsheet and csv file I/O.
//!
//! Writing goes through `rust_xlsxwriter` (one worksheet per table, bold
//! header row) or the `csv` writer; reading goes through `calamine` or the
//! `csv` reader. All functions here are blocking.

use crate::engine::outcome::ToolError;
use crate::engine::sheets::table::{Cell, Row, Table};
use crate::error_ext::ToToolError;
use calamine::{Data, DataType, Reader, open_workbook_auto};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde::Deserialize;
use serde_json::{Number, Value};
use std::path::Path;

/// File formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Spreadsheet,
    Csv,
}

impl FileFormat {
    /// Formats accepted by `read_excel`.
    pub fn for_read(path: &Path) -> Result<Self, ToolError> {
        match extension(path).as_deref() {
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Ok(Self::Spreadsheet),
            Some("csv") => Ok(Self::Csv),
            other => Err(unsupported(other)),
        }
    }

    /// Formats `write_excel` can produce.
    pub fn for_write(path: &Path) -> Result<Self, ToolError> {
        match extension(path).as_deref() {
            Some("xlsx") => Ok(Self::Spreadsheet),
            Some("csv") => Ok(Self::Csv),
            other => Err(unsupported(other)),
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

fn unsupported(ext: Option<&str>) -> ToolError {
    match ext {
        Some(ext) => ToolError::UnsupportedFormat(format!(".{ext}")),
        None => ToolError::UnsupportedFormat("file has no extension".to_string()),
    }
}

/// Which worksheet `read_excel` should load.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

const MAX_SHEET_NAME_CHARS: usize = 31;
const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

fn ensure_parent(path: &Path) -> Result<(), ToolError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).tool_err("Failed to create directory")?;
    }
    Ok(())
}

// ───── Writing ─────

/// Write every table as its own worksheet, replacing any existing file.
pub fn write_workbook(path: &Path, sheets: &[(String, Table)]) -> Result<(), ToolError> {
    ensure_parent(path)?;
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    for (name, table) in sheets {
        let worksheet = workbook.add_worksheet();
        fill_worksheet(worksheet, name, table, &header)?;
    }
    workbook.save(path).tool_err("Failed to save workbook")
}

/// Reject names a worksheet cannot carry, before anything is stored under them.
pub fn check_sheet_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("sheet name must not be empty".into());
    }
    if name.chars().count() > MAX_SHEET_NAME_CHARS {
        return Err(format!(
            "sheet name '{name}' is longer than {MAX_SHEET_NAME_CHARS} characters"
        ));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_SHEET_CHARS.contains(c)) {
        return Err(format!("sheet name '{name}' contains '{c}'"));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(format!(
            "sheet name '{name}' must not start or end with an apostrophe"
        ));
    }
    Ok(())
}

/// Write a single table in the format implied by the file extension.
pub fn write_table(path: &Path, table: &Table, sheet_name: &str) -> Result<(), ToolError> {
    match FileFormat::for_write(path)? {
        FileFormat::Spreadsheet => write_workbook(path, &[(sheet_name.to_string(), table.clone())]),
        FileFormat::Csv => {
            ensure_parent(path)?;
            write_csv(path, table)
        }
    }
}

fn fill_worksheet(
    worksheet: &mut Worksheet,
    name: &str,
    table: &Table,
    header: &Format,
) -> Result<(), ToolError> {
    worksheet
        .set_name(name)
        .tool_err(&format!("Invalid sheet name '{name}'"))?;

    let (columns, cells) = table.grid();
    for (c, title) in columns.iter().enumerate() {
        let col = u16::try_from(c).tool_err("Too many columns")?;
        worksheet
            .write_string_with_format(0, col, title, header)
            .tool_err("Failed to write header")?;
    }

    for (r, row) in cells.iter().enumerate() {
        let row_idx = u32::try_from(r + 1).tool_err("Too many rows")?;
        for (c, cell) in row.iter().enumerate() {
            let col = u16::try_from(c).tool_err("Too many columns")?;
            let written = match cell {
                Cell::Empty => continue,
                Cell::Bool(b) => worksheet.write_boolean(row_idx, col, *b).map(|_| ()),
                Cell::Number(n) => worksheet.write_number(row_idx, col, *n).map(|_| ()),
                Cell::Text(s) => worksheet.write_string(row_idx, col, s).map(|_| ()),
            };
            written.tool_err("Failed to write cell")?;
        }
    }
    Ok(())
}

fn write_csv(path: &Path, table: &Table) -> Result<(), ToolError> {
    let (columns, cells) = table.grid();
    if columns.is_empty() {
        // csv quotes an empty record as `""`; rows without keys are bare line breaks.
        return std::fs::write(path, "\n".repeat(cells.len())).tool_err("Failed to write csv file");
    }
    let mut writer = csv::Writer::from_path(path).tool_err("Failed to create csv file")?;
    writer
        .write_record(&columns)
        .tool_err("Failed to write csv header")?;
    for row in cells {
        writer
            .write_record(row.iter().map(Cell::to_field))
            .tool_err("Failed to write csv row")?;
    }
    writer.flush().tool_err("Failed to write csv file")
}

// ───── Reading ─────

/// Rows read back from a file, with the header that named them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Frame {
    /// The first `limit` rows as column → value records.
    pub fn records(&self, limit: usize) -> Vec<Row> {
        self.rows
            .iter()
            .take(limit)
            .map(|row| {
                self.columns
                    .iter()
                    .enumerate()
                    .map(|(i, column)| (column.clone(), row.get(i).cloned().unwrap_or(Value::Null)))
                    .collect()
            })
            .collect()
    }
}

/// Read the header and at most `max_rows` data rows.
pub fn read_table(
    path: &Path,
    sheet: Option<&SheetSelector>,
    max_rows: usize,
) -> Result<Frame, ToolError> {
    if !path.exists() {
        return Err(ToolError::MissingFile(path.to_path_buf()));
    }
    match FileFormat::for_read(path)? {
        FileFormat::Spreadsheet => read_spreadsheet(path, sheet, max_rows),
        FileFormat::Csv => read_csv(path, max_rows),
    }
}

fn read_spreadsheet(
    path: &Path,
    sheet: Option<&SheetSelector>,
    max_rows: usize,
) -> Result<Frame, ToolError> {
    const CONTEXT: &str = "Failed to read spreadsheet";
    let mut workbook = open_workbook_auto(path).tool_err("Failed to open spreadsheet")?;
    let range = match sheet {
        Some(SheetSelector::Name(name)) => workbook.worksheet_range(name).tool_err(CONTEXT)?,
        Some(SheetSelector::Index(index)) => workbook
            .worksheet_range_at(*index)
            .ok_or_else(|| ToolError::failed(CONTEXT, format!("no worksheet at index {index}")))?
            .tool_err(CONTEXT)?,
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ToolError::failed(CONTEXT, "workbook has no worksheets"))?
            .tool_err(CONTEXT)?,
    };

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Frame::default());
    };
    let columns = dedupe_columns(header.iter().enumerate().map(|(i, cell)| match cell {
        Data::Empty => format!("Unnamed: {i}"),
        Data::String(s) => s.clone(),
        other => match cell_to_json(other) {
            Value::String(s) => s,
            value => value.to_string(),
        },
    }));
    let rows = rows
        .take(max_rows)
        .map(|row| row.iter().map(cell_to_json).collect())
        .collect();
    Ok(Frame { columns, rows })
}

fn read_csv(path: &Path, max_rows: usize) -> Result<Frame, ToolError> {
    const CONTEXT: &str = "Failed to read csv file";
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .tool_err(CONTEXT)?;
    let headers = reader.headers().tool_err(CONTEXT)?.clone();
    let columns = dedupe_columns(headers.iter().enumerate().map(|(i, name)| {
        if name.is_empty() {
            format!("Unnamed: {i}")
        } else {
            name.to_string()
        }
    }));
    let mut rows = Vec::new();
    for record in reader.records().take(max_rows) {
        let record = record.tool_err(CONTEXT)?;
        rows.push(record.iter().map(infer_scalar).collect());
    }
    Ok(Frame { columns, rows })
}

/// Repeated header names get a `.N` suffix so every column stays addressable.
fn dedupe_columns(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for name in names {
        let mut candidate = name.clone();
        let mut n = 1;
        while columns.contains(&candidate) {
            candidate = format!("{name}.{n}");
            n += 1;
        }
        columns.push(candidate);
    }
    columns
}

fn float_to_json(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        return Value::from(f as i64);
    }
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

fn cell_to_json(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => float_to_json(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) => Value::String(s.clone()),
        Data::DateTime(excel) => match cell.as_datetime() {
            Some(dt) => Value::String(dt.to_string()),
            None => float_to_json(excel.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(e) => Value::String(e.to_string()),
    }
}

fn infer_scalar(field: &str) -> Value {
    if field.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = field.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = field.parse::<f64>()
        && let Some(n) = Number::from_f64(f)
    {
        return Value::Number(n);
    }
    match field {
        "True" | "TRUE" | "true" => Value::Bool(true),
        "False" | "FALSE" | "false" => Value::Bool(false),
        _ => Value::String(field.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(value: Value) -> Table {
        Table::from_rows(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn formats_are_chosen_by_extension() {
        assert_eq!(
            FileFormat::for_read(Path::new("a.XLSX")).unwrap(),
            FileFormat::Spreadsheet
        );
        assert_eq!(
            FileFormat::for_read(Path::new("a.csv")).unwrap(),
            FileFormat::Csv
        );
        assert!(matches!(
            FileFormat::for_read(Path::new("a.txt")),
            Err(ToolError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            FileFormat::for_write(Path::new("a.xls")),
            Err(ToolError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            FileFormat::for_write(Path::new("noext")),
            Err(ToolError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn sheet_selector_accepts_names_and_indices() {
        let by_index: SheetSelector = serde_json::from_value(json!(1)).unwrap();
        let by_name: SheetSelector = serde_json::from_value(json!("Data")).unwrap();
        assert_eq!(by_index, SheetSelector::Index(1));
        assert_eq!(by_name, SheetSelector::Name("Data".into()));
    }

    #[test]
    fn workbook_round_trips_through_calamine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("book.xlsx");
        let people = table(json!([
            { "name": "Ada", "age": 36, "active": true },
            { "name": "Linus", "age": 54.5, "active": false },
        ]));
        let empty = table(json!([{ "x": 1 }]));
        write_workbook(
            &path,
            &[("People".to_string(), people), ("Other".to_string(), empty)],
        )
        .unwrap();

        let frame = read_table(&path, Some(&SheetSelector::Name("People".into())), 100).unwrap();
        assert_eq!(frame.columns, ["name", "age", "active"]);
        assert_eq!(frame.rows.len(), 2);
        let records = frame.records(10);
        assert_eq!(records[0]["name"], json!("Ada"));
        assert_eq!(records[0]["age"], json!(36));
        assert_eq!(records[1]["age"], json!(54.5));
        assert_eq!(records[1]["active"], json!(false));

        let second = read_table(&path, Some(&SheetSelector::Index(1)), 100).unwrap();
        assert_eq!(second.columns, ["x"]);
    }

    #[test]
    fn read_respects_row_cap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("many.csv");
        let rows: Vec<Value> = (0..30).map(|i| json!({ "n": i })).collect();
        write_table(&path, &table(Value::Array(rows)), "Sheet1").unwrap();

        let frame = read_table(&path, None, 25).unwrap();
        assert_eq!(frame.rows.len(), 25);
        assert_eq!(frame.records(10).len(), 10);
    }

    #[test]
    fn csv_values_are_inferred() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.csv");
        std::fs::write(&path, "a,b,c,d,a\n1,2.5,True,,text\n").unwrap();

        let frame = read_table(&path, None, 100).unwrap();
        assert_eq!(frame.columns, ["a", "b", "c", "d", "a.1"]);
        assert_eq!(
            frame.rows[0],
            vec![json!(1), json!(2.5), json!(true), Value::Null, json!("text")]
        );
    }

    #[test]
    fn missing_file_is_reported_before_format() {
        let err = read_table(Path::new("/definitely/not/here.txt"), None, 10).unwrap_err();
        assert!(matches!(err, ToolError::MissingFile(_)));
    }

    #[test]
    fn invalid_sheet_name_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.xlsx");
        let err = write_workbook(&path, &[("bad/name".to_string(), Table::default())]).unwrap_err();
        assert!(matches!(err, ToolError::Failed { .. }));
    }

    #[test]
    fn sheet_names_the_writer_rejects_are_caught_up_front() {
        for name in ["Sales 2026", "Q3 'draft' v2", &"x".repeat(31)] {
            assert!(check_sheet_name(name).is_ok(), "{name}");
        }
        for name in ["", "bad/name", "a:b", "[x]", "'quoted", &"x".repeat(32)] {
            let reason = check_sheet_name(name).unwrap_err();
            assert!(reason.starts_with("sheet name"), "{name}: {reason}");
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("check.xlsx");
            assert!(
                write_workbook(&path, &[(name.to_string(), Table::default())]).is_err(),
                "writer accepted {name:?}"
            );
        }
    }

    #[test]
    fn keyless_rows_become_blank_csv_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.csv");
        write_table(&path, &table(json!([{}, {}])), "Sheet1").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "\n\n");

        let path = dir.path().join("gaps.csv");
        write_table(&path, &table(json!([{ "a": 1, "b": "x" }, {}])), "Sheet1").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\n1,x\n,\n");
    }

    #[test]
    fn duplicate_headers_are_suffixed() {
        let names = ["a", "a", "a", "b"].into_iter().map(String::from);
        assert_eq!(dedupe_columns(names), ["a", "a.1", "a.2", "b"]);
    }
}
