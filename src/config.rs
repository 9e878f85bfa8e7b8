// Function configuration
//
// The Functions platform exposes function configuration as environment
// variables with the key names verbatim, so all lookups go through a plain
// key-value map and tests inject maps directly.

use std::collections::HashMap;

use thiserror::Error;
use tracing::info;

pub const DEFAULT_LOG_GROUP_NAME: &str = "waf-stg-log-group";
pub const DEFAULT_LOG_NAME: &str = "waf-stg-log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration key `{0}`")]
    MissingKey(&'static str),
    #[error("invalid value `{value}` for configuration key `{key}`")]
    InvalidValue { key: &'static str, value: String },
}

/// Where each ingestion entry's `time` field comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryTimeSource {
    /// Wall-clock time at transformation.
    #[default]
    Ingestion,
    /// The record's own `@timestamp` field.
    Record,
}

#[derive(Debug, Clone)]
pub struct FunctionConfig {
    pub compartment_id: String,
    pub log_group_name: String,
    pub log_name: String,
    pub entry_time_source: EntryTimeSource,
    pub region: String,
    pub logging_endpoint: String,
    pub ingestion_endpoint: String,
    /// Optional override; the default endpoint is derived per namespace.
    pub object_storage_endpoint: Option<String>,
}

impl FunctionConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_map(&std::env::vars().collect())
    }

    pub fn from_map(cfg: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let compartment_id = cfg
            .get("compartment_ocid")
            .cloned()
            .ok_or(ConfigError::MissingKey("compartment_ocid"))?;

        let log_group_name = optional(cfg, "waf-stg-log-group-name", DEFAULT_LOG_GROUP_NAME);
        let log_name = optional(cfg, "waf-stg-log-name", DEFAULT_LOG_NAME);

        let entry_time_source = match cfg.get("waf-stg-entry-time-source").map(String::as_str) {
            None | Some("ingestion") => EntryTimeSource::Ingestion,
            Some("record") => EntryTimeSource::Record,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "waf-stg-entry-time-source",
                    value: other.to_string(),
                })
            }
        };

        // The platform always sets the region for resource-principal workloads.
        let region = cfg
            .get("OCI_RESOURCE_PRINCIPAL_REGION")
            .cloned()
            .ok_or(ConfigError::MissingKey("OCI_RESOURCE_PRINCIPAL_REGION"))?;

        let logging_endpoint = cfg
            .get("logging-endpoint")
            .cloned()
            .unwrap_or_else(|| format!("https://logging.{region}.oci.oraclecloud.com"));
        let ingestion_endpoint = cfg
            .get("ingestion-endpoint")
            .cloned()
            .unwrap_or_else(|| format!("https://ingestion.logging.{region}.oci.oraclecloud.com"));
        let object_storage_endpoint = cfg.get("object-storage-endpoint").cloned();

        Ok(Self {
            compartment_id,
            log_group_name,
            log_name,
            entry_time_source,
            region,
            logging_endpoint,
            ingestion_endpoint,
            object_storage_endpoint,
        })
    }
}

fn optional(cfg: &HashMap<String, String>, key: &str, default: &str) -> String {
    match cfg.get(key) {
        Some(value) => value.clone(),
        None => {
            info!(key, default, "optional configuration key unavailable, assigning default");
            default.to_string()
        }
    }
}
