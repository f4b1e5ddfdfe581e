//! Markdown table codec for collection items
//!
//! Items are stored as a pipe table whose columns are the collection's
//! fields, in schema order:
//!
//! ```text
//! | song_name | difficulty | practiced_today |
//! | --- | --- | --- |
//! | Wonderwall | beginner | ✓ |
//! ```
//!
//! The format is meant to be edited by hand, so decoding is lenient:
//! rows with the wrong number of cells are skipped, empty cells leave the
//! key out, and cell text that does not fit the declared type is kept as
//! text (or, for booleans, read as `false`).

use std::collections::HashMap;

use crate::domain::{Field, FieldType, Item, ItemData, Value};

/// Cell text for `true`
pub const CHECK: &str = "✓";

/// Cell text for `false`
pub const CROSS: &str = "✗";

const SEPARATOR_CELL: &str = "---";

fn escape(text: &str) -> String {
    text.replace('|', "\\|")
}

fn unescape(text: &str) -> String {
    text.replace("\\|", "|")
}

/// Renders one value as cell text
fn render_cell(value: &Value) -> String {
    match value {
        Value::Boolean(true) => CHECK.to_string(),
        Value::Boolean(false) => CROSS.to_string(),
        Value::Integer(n) => n.to_string(),
        Value::Real(x) => {
            let s = x.to_string();
            // Keep a '.' so the cell decodes as a real again
            if x.is_finite() && !s.contains('.') {
                format!("{}.0", s)
            } else {
                s
            }
        }
        Value::Text(s) => escape(s),
    }
}

fn render_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

/// Renders items as a markdown table; empty when there is nothing to show
pub fn encode(fields: &[Field], items: &[Item]) -> String {
    if items.is_empty() || fields.is_empty() {
        return String::new();
    }

    let header: Vec<String> = fields.iter().map(|f| escape(&f.name)).collect();
    let separator: Vec<String> = fields.iter().map(|_| SEPARATOR_CELL.to_string()).collect();

    let mut lines = Vec::with_capacity(items.len() + 2);
    lines.push(render_row(&header));
    lines.push(render_row(&separator));

    for item in items {
        let cells: Vec<String> = fields
            .iter()
            .map(|f| item.get(&f.name).map(render_cell).unwrap_or_default())
            .collect();
        lines.push(render_row(&cells));
    }

    lines.join("\n")
}

/// Splits a `| a | b |` line into trimmed cells
///
/// `\|` is cell content, not a separator. Returns `None` if the line is not
/// enclosed in pipes.
fn split_row(line: &str) -> Option<Vec<String>> {
    let line = line.trim();
    if line.len() < 2 || !line.starts_with('|') || !line.ends_with('|') {
        return None;
    }

    let inner = &line[1..line.len() - 1];
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('\\');
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    cells.push(current);

    Some(cells.into_iter().map(|c| c.trim().to_string()).collect())
}

/// Converts one non-empty cell according to the declared field type
fn decode_cell(text: &str, field_type: &FieldType) -> Value {
    match field_type {
        FieldType::Boolean => Value::Boolean(text == CHECK),
        FieldType::Number => {
            let parsed = if text.contains('.') {
                text.parse::<f64>().ok().map(Value::Real)
            } else {
                text.parse::<i64>().ok().map(Value::Integer)
            };
            parsed.unwrap_or_else(|| Value::Text(unescape(text)))
        }
        _ => Value::Text(unescape(text)),
    }
}

/// Parses a markdown table back into items
///
/// The header row, not `fields`, decides the columns; `fields` only supplies
/// each column's type (unknown columns are text).
pub fn decode(table: &str, fields: &[Field]) -> Vec<Item> {
    let table = table.trim();
    if table.is_empty() {
        return Vec::new();
    }

    let lines: Vec<&str> = table.lines().collect();
    if lines.len() < 3 {
        return Vec::new();
    }

    let columns: Vec<String> = match split_row(lines[0]) {
        Some(cells) => cells.iter().map(|c| unescape(c)).collect(),
        None => return Vec::new(),
    };

    let types: HashMap<&str, &FieldType> = fields
        .iter()
        .map(|f| (f.name.as_str(), &f.field_type))
        .collect();

    let mut items = Vec::new();
    for (line_num, line) in lines.iter().enumerate().skip(2) {
        let cells = match split_row(line) {
            Some(cells) => cells,
            None => continue,
        };

        if cells.len() != columns.len() {
            tracing::trace!(
                line = line_num + 1,
                expected = columns.len(),
                found = cells.len(),
                "skipping table row with wrong cell count"
            );
            continue;
        }

        let mut data = ItemData::new();
        for (column, cell) in columns.iter().zip(&cells) {
            if cell.is_empty() {
                continue;
            }
            let field_type = types.get(column.as_str()).copied().unwrap_or(&FieldType::Text);
            data.insert(column.clone(), decode_cell(cell, field_type));
        }

        if !data.is_empty() {
            items.push(Item::new(data));
        }
    }

    items
}
