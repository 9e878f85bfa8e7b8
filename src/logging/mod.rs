// Logging service data model and client seams
//
// Mirrors the subset of the Logging management and ingestion APIs the
// shipper touches. Concrete transport lives in `rest`; provisioning and
// upload logic only see the traits, so tests substitute fakes.

pub mod ingest;
pub mod provision;
pub mod rest;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Type marker for logs the shipper provisions.
pub const CUSTOM_LOG_TYPE: &str = "CUSTOM";

/// Batch-level metadata is fixed for this shipper.
pub const BATCH_SOURCE: &str = "WAF-Log-Upload";
pub const BATCH_TYPE: &str = "WAF-Log";
pub const BATCH_SUBJECT: &str = "WAF-Log_Staging_Area";
pub const SPEC_VERSION: &str = "1.0";

/// Summary returned by the list endpoints; log groups and logs share the
/// fields the shipper needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSummary {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLogGroupDetails {
    pub compartment_id: String,
    pub display_name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLogDetails {
    pub display_name: String,
    pub log_type: String,
}

/// One reshaped WAF record, ready for ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub data: String,
    pub id: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEntryBatch {
    pub entries: Vec<LogEntry>,
    pub source: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Service-side fallback only; independent of each entry's `time`.
    pub defaultlogentrytime: String,
    pub subject: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PutLogsDetails {
    pub specversion: String,
    pub log_entry_batches: Vec<LogEntryBatch>,
}

/// Management-plane operations: list/create log groups and custom logs.
#[async_trait]
pub trait LoggingManagement: Send + Sync {
    async fn list_log_groups(
        &self,
        compartment_id: &str,
        display_name: &str,
    ) -> Result<Vec<ResourceSummary>>;

    async fn create_log_group(&self, details: &CreateLogGroupDetails) -> Result<()>;

    async fn list_logs(
        &self,
        log_group_id: &str,
        log_type: &str,
        display_name: &str,
    ) -> Result<Vec<ResourceSummary>>;

    async fn create_log(&self, log_group_id: &str, details: &CreateLogDetails) -> Result<()>;
}

/// Ingestion-plane operation: push one batch of entries.
#[async_trait]
pub trait LogIngestion: Send + Sync {
    async fn put_logs(&self, log_id: &str, details: &PutLogsDetails) -> Result<()>;
}
