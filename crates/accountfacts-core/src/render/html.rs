//! HTML table renderer with a client-side substring row filter.
//!
//! Records are serialized to JSON values and rendered generically:
//! arrays become nested lists, objects become nested tables, so the
//! grouped membership structure of the normalized records stays visible.

use serde::Serialize;
use serde_json::Value;

use crate::errors::ReportResult;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => escape(s),
        Value::Array(items) => {
            let mut out = String::from("<ul>");
            for item in items {
                out.push_str("<li>");
                out.push_str(&render_value(item));
                out.push_str("</li>");
            }
            out.push_str("</ul>");
            out
        }
        Value::Object(map) => {
            let mut out = String::from("<table class=\"nested\">");
            for (key, nested) in map {
                out.push_str("<tr><th>");
                out.push_str(&escape(key));
                out.push_str("</th><td>");
                out.push_str(&render_value(nested));
                out.push_str("</td></tr>");
            }
            out.push_str("</table>");
            out
        }
        other => escape(&other.to_string()),
    }
}

const FILTER_SCRIPT: &str = r#"<script>
function filterRows() {
  var needle = document.getElementById('filter').value.toLowerCase();
  var rows = document.querySelectorAll('#report tbody tr');
  for (var i = 0; i < rows.length; i++) {
    var text = rows[i].textContent.toLowerCase();
    rows[i].style.display = text.indexOf(needle) === -1 ? 'none' : '';
  }
}
</script>"#;

const STYLE: &str = r#"<style>
table { border-collapse: collapse; }
th, td { border: 1px solid #999; padding: 4px 8px; vertical-align: top; text-align: left; }
table.nested { margin: 0; }
ul { margin: 0; padding-left: 1.2em; }
</style>"#;

/// Render `records` as a standalone HTML page with one table row per
/// record and a text input that hides rows not containing the typed
/// substring.
pub fn render<T: Serialize>(report: &str, records: &[T]) -> ReportResult<String> {
    let values: Vec<Value> = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()?;

    // All records serialize from one struct, so the first record's keys
    // are the column set.
    let columns: Vec<String> = values
        .first()
        .and_then(|v| v.as_object())
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default();

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str(&format!("<title>{}</title>\n", escape(report)));
    out.push_str(STYLE);
    out.push('\n');
    out.push_str(FILTER_SCRIPT);
    out.push_str("\n</head>\n<body>\n");
    out.push_str(&format!("<h1>{}</h1>\n", escape(report)));
    out.push_str(
        "<p><input type=\"text\" id=\"filter\" placeholder=\"Filter rows\" \
         onkeyup=\"filterRows()\"></p>\n",
    );
    out.push_str("<table id=\"report\">\n<thead><tr>");
    for column in &columns {
        out.push_str(&format!("<th>{}</th>", escape(column)));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for value in &values {
        out.push_str("<tr>");
        if let Some(map) = value.as_object() {
            for column in &columns {
                out.push_str("<td>");
                out.push_str(&render_value(map.get(column).unwrap_or(&Value::Null)));
                out.push_str("</td>");
            }
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    Ok(out)
}
