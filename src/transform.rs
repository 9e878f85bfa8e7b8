// Record transformation
//
// Decompresses the whole object, splits it into JSON lines and reshapes each
// record into a Logging ingestion entry. A line that fails to parse aborts
// the whole batch: no partial submission, no skip-and-continue.

use std::io::Read;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::config::EntryTimeSource;
use crate::logging::LogEntry;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Field carrying the record's own event time.
const RECORD_TIMESTAMP_FIELD: &str = "@timestamp";

pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// ISO-8601 with millisecond precision and UTC "Z" suffix.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Decompress a gzip object and reshape every non-empty JSON line into a
/// [`LogEntry`], preserving source line order.
pub fn transform(raw: &[u8], time_source: EntryTimeSource) -> Result<Vec<LogEntry>> {
    let mut text = String::new();
    GzDecoder::new(raw)
        .read_to_string(&mut text)
        .context("decompressing object contents")?;

    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    info!(entries = lines.len(), "number of log entries");

    let mut entries = Vec::with_capacity(lines.len());
    for line in lines {
        let record: Value =
            serde_json::from_str(line).context("parsing log record as JSON")?;
        let time = entry_time(&record, time_source)?;
        entries.push(LogEntry {
            data: flatten(&record),
            id: Uuid::new_v4().to_string(),
            time,
        });
    }
    Ok(entries)
}

/// Lossy flattening: the serialized record with `{`, `}`, `"` and `\`
/// stripped out. Downstream consumers get plain text, not JSON.
fn flatten(record: &Value) -> String {
    record
        .to_string()
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '"' | '\\'))
        .collect()
}

fn entry_time(record: &Value, source: EntryTimeSource) -> Result<String> {
    match source {
        EntryTimeSource::Ingestion => Ok(now_timestamp()),
        EntryTimeSource::Record => {
            let raw = record
                .get(RECORD_TIMESTAMP_FIELD)
                .and_then(Value::as_str)
                .with_context(|| format!("record has no `{RECORD_TIMESTAMP_FIELD}` field"))?;
            let parsed = DateTime::parse_from_rfc3339(raw).with_context(|| {
                format!("record `{RECORD_TIMESTAMP_FIELD}` is not RFC 3339: {raw}")
            })?;
            Ok(format_timestamp(parsed.with_timezone(&Utc)))
        }
    }
}
