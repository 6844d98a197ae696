//! Structured-data serializer: normalized records wrapped with run
//! metadata.

use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::errors::ReportResult;

fn invoking_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Render `records` as a pretty-printed JSON document with report name,
/// run timestamp, and invoking identity.
pub fn render<T: Serialize>(report: &str, records: &[T]) -> ReportResult<String> {
    let payload = json!({
        "report": report,
        "generated_at": Utc::now().to_rfc3339(),
        "generated_by": invoking_user(),
        "records": records,
    });
    Ok(serde_json::to_string_pretty(&payload)?)
}
