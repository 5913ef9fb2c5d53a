//! Tabular datasets built from JSON row records.

use serde_json::{Map, Value};

/// One input row: column name → scalar value, in the order the client sent.
pub type Row = Map<String, Value>;

/// A cell value as written to a spreadsheet or csv file.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    /// Nested arrays and objects are kept as their JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n
                .as_f64()
                .map(Self::Number)
                .unwrap_or_else(|| Self::Text(n.to_string())),
            Value::String(s) => Self::Text(s.clone()),
            other => Self::Text(other.to_string()),
        }
    }

    /// Text form used by the csv writer.
    pub fn to_field(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Bool(true) => "True".to_string(),
            Self::Bool(false) => "False".to_string(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// The rows of one sheet, kept verbatim.
///
/// Rows are not required to share the same keys. The column set is the union
/// of every row's keys in first-seen order; a row lacking a column leaves that
/// cell empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for row in &self.rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        columns
    }

    /// Header plus a dense grid of cells aligned to it.
    pub fn grid(&self) -> (Vec<String>, Vec<Vec<Cell>>) {
        let columns = self.columns();
        let cells = self
            .rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| row.get(c).map(Cell::from_json).unwrap_or(Cell::Empty))
                    .collect()
            })
            .collect();
        (columns, cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(value: Value) -> Vec<Row> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn columns_follow_first_row_when_uniform() {
        let table = Table::from_rows(rows(json!([
            { "name": "Ada", "age": 36 },
            { "name": "Linus", "age": 54 },
        ])));
        assert_eq!(table.columns(), ["name", "age"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn mismatched_rows_are_kept_verbatim() {
        let input = rows(json!([
            { "a": 1 },
            { "b": "x", "a": 2 },
        ]));
        let table = Table::from_rows(input.clone());
        assert_eq!(table.rows(), input.as_slice());
        assert_eq!(table.columns(), ["a", "b"]);

        let (_, cells) = table.grid();
        assert_eq!(cells[0], vec![Cell::Number(1.0), Cell::Empty]);
        assert_eq!(cells[1], vec![Cell::Number(2.0), Cell::Text("x".into())]);
    }

    #[test]
    fn nested_values_become_json_text() {
        let cell = Cell::from_json(&json!({ "k": [1, 2] }));
        assert_eq!(cell, Cell::Text(r#"{"k":[1,2]}"#.into()));
        assert_eq!(Cell::from_json(&Value::Null), Cell::Empty);
    }

    #[test]
    fn csv_fields_render_scalars() {
        assert_eq!(Cell::Number(2.5).to_field(), "2.5");
        assert_eq!(Cell::Number(3.0).to_field(), "3");
        assert_eq!(Cell::Bool(true).to_field(), "True");
        assert_eq!(Cell::Empty.to_field(), "");
    }

    #[test]
    fn empty_table_has_no_columns() {
        let table = Table::default();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }
}
