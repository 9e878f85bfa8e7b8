// Batch upload to the ingestion endpoint
//
// All entries from one object go out as a single LogEntryBatch inside a
// single push; no chunking by size or count, no retry on transient failure.

use anyhow::{Context, Result};
use tracing::info;

use super::{
    LogEntry, LogEntryBatch, LogIngestion, PutLogsDetails, BATCH_SOURCE, BATCH_SUBJECT,
    BATCH_TYPE, SPEC_VERSION,
};
use crate::transform::now_timestamp;

pub fn build_batch(entries: Vec<LogEntry>, default_entry_time: String) -> PutLogsDetails {
    PutLogsDetails {
        specversion: SPEC_VERSION.to_string(),
        log_entry_batches: vec![LogEntryBatch {
            entries,
            source: BATCH_SOURCE.to_string(),
            entry_type: BATCH_TYPE.to_string(),
            defaultlogentrytime: default_entry_time,
            subject: BATCH_SUBJECT.to_string(),
        }],
    }
}

pub async fn upload(client: &dyn LogIngestion, log_id: &str, entries: Vec<LogEntry>) -> Result<()> {
    info!(log_id, entries = entries.len(), "pushing log entry batch");
    let details = build_batch(entries, now_timestamp());
    client
        .put_logs(log_id, &details)
        .await
        .context("pushing log entry batch")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: u32) -> LogEntry {
        LogEntry {
            data: format!("status:{n}"),
            id: format!("id-{n}"),
            time: "2021-02-01T08:30:15.250Z".to_string(),
        }
    }

    #[test]
    fn batch_carries_fixed_labels_and_all_entries() {
        let details = build_batch(vec![entry(1), entry(2)], now_timestamp());

        assert_eq!(details.specversion, "1.0");
        assert_eq!(details.log_entry_batches.len(), 1);
        let batch = &details.log_entry_batches[0];
        assert_eq!(batch.source, "WAF-Log-Upload");
        assert_eq!(batch.entry_type, "WAF-Log");
        assert_eq!(batch.subject, "WAF-Log_Staging_Area");
        assert_eq!(batch.entries.len(), 2);
    }

    #[test]
    fn wire_shape_matches_the_service() {
        let details = build_batch(vec![entry(1)], "2021-02-01T09:00:00.000Z".to_string());
        let body = serde_json::to_value(&details).unwrap();

        assert_eq!(body["specversion"], "1.0");
        let batch = &body["logEntryBatches"][0];
        assert_eq!(batch["type"], "WAF-Log");
        assert_eq!(batch["defaultlogentrytime"], "2021-02-01T09:00:00.000Z");
        assert_eq!(batch["entries"][0]["data"], "status:1");
        assert_eq!(batch["entries"][0]["id"], "id-1");
    }
}
