//! Delimited-text serializer for denormalized rows.
//!
//! Header = the union of keys across all rows in first-seen order; one
//! data row per record with values in header order. Every field is
//! double-quoted, embedded quotes doubled.

use indexmap::IndexSet;
use serde_json::Value;

use crate::models::FlatRow;

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn render(rows: &[FlatRow]) -> String {
    let mut columns: IndexSet<&str> = IndexSet::new();
    for row in rows {
        for key in row.keys() {
            columns.insert(key.as_str());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = columns.iter().map(|c| quote(c)).collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for row in rows {
        let line: Vec<String> = columns
            .iter()
            .map(|c| quote(&row.get(*c).map(scalar).unwrap_or_default()))
            .collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}
