// The provisioning / fetch / transform / upload pipeline
//
// Every stage is fallible and the outcome is an explicit result, so the
// handler boundary alone decides what the platform sees.

use thiserror::Error;

use crate::event::ObjectUploadEvent;
use crate::logging::{ingest, provision};
use crate::{transform, HandlerState};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("provisioning failed: {0:#}")]
    Provision(anyhow::Error),
    #[error("object fetch failed: {0:#}")]
    Fetch(anyhow::Error),
    #[error("transform failed: {0:#}")]
    Transform(anyhow::Error),
    #[error("upload failed: {0:#}")]
    Upload(anyhow::Error),
}

impl PipelineError {
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Provision(_) => "provision",
            Self::Fetch(_) => "fetch",
            Self::Transform(_) => "transform",
            Self::Upload(_) => "upload",
        }
    }
}

#[derive(Debug)]
pub struct PipelineReport {
    pub log_id: String,
    pub entries_uploaded: usize,
}

pub async fn run(
    event: &ObjectUploadEvent,
    state: &HandlerState,
) -> Result<PipelineReport, PipelineError> {
    let group_id = provision::ensure_log_group(
        state.management.as_ref(),
        &state.config.compartment_id,
        &state.config.log_group_name,
    )
    .await
    .map_err(PipelineError::Provision)?;

    let log_id =
        provision::ensure_log_stream(state.management.as_ref(), &group_id, &state.config.log_name)
            .await
            .map_err(PipelineError::Provision)?;

    let raw = state
        .object_store
        .fetch(event.namespace(), event.bucket_name(), event.object_name())
        .await
        .map_err(PipelineError::Fetch)?;

    let entries = transform::transform(&raw, state.config.entry_time_source)
        .map_err(PipelineError::Transform)?;
    let entries_uploaded = entries.len();

    ingest::upload(state.ingestion.as_ref(), &log_id, entries)
        .await
        .map_err(PipelineError::Upload)?;

    Ok(PipelineReport {
        log_id,
        entries_uploaded,
    })
}
