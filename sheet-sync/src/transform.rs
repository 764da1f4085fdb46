//! Worksheet grid to record conversion
//!
//! The first row of a used range is the header; every later row becomes one
//! [`Record`] keyed by those header names. Row lengths are never validated:
//! short rows leave trailing fields missing and long rows lose their extra
//! cells.

use serde_json::Value;

/// A single cell as returned by the workbook API (string, number, bool or null)
pub type CellValue = Value;

/// Rows of cells, header first
pub type Grid = Vec<Vec<CellValue>>;

/// One data row keyed by header name, in header order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. A name that already exists keeps its position and takes the new value.
    pub fn insert(&mut self, name: impl Into<String>, value: CellValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Value of a field, `None` when the row had no cell for it
    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Text form of a field: strings as-is, numbers rendered. Booleans and nulls have none.
    pub fn get_text(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Convert a grid into one record per data row
pub fn rows_to_records(grid: &Grid) -> Vec<Record> {
    let Some((header, rows)) = grid.split_first() else {
        return Vec::new();
    };

    let names: Vec<String> = header.iter().map(header_name).collect();

    rows.iter()
        .map(|row| {
            let mut record = Record::new();
            for (name, cell) in names.iter().zip(row.iter()) {
                record.insert(name.clone(), cell.clone());
            }
            record
        })
        .collect()
}

fn header_name(cell: &CellValue) -> String {
    match cell {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Derive a URL slug: lowercase, each run of whitespace becomes one hyphen
pub fn slugify(name: &str) -> String {
    // whole-string lowercasing keeps context rules such as final sigma
    let lower = name.to_lowercase();
    let mut slug = String::with_capacity(lower.len());
    let mut in_whitespace = false;

    for ch in lower.chars() {
        if is_slug_whitespace(ch) {
            if !in_whitespace {
                slug.push('-');
                in_whitespace = true;
            }
        } else {
            slug.push(ch);
            in_whitespace = false;
        }
    }

    slug
}

/// Unicode white space plus the byte order mark, without NEL (U+0085)
fn is_slug_whitespace(ch: char) -> bool {
    ch == '\u{FEFF}' || (ch.is_whitespace() && ch != '\u{0085}')
}
