// Idempotent provisioning of the destination log group and custom log
//
// Lookup-before-create: list by display name, create only when the list is
// empty, then re-list for the service-assigned id. A concurrent creator can
// still race us into duplicates; the service's own filtering is the only
// uniqueness guard.

use anyhow::{bail, Context, Result};
use tracing::info;

use super::{CreateLogDetails, CreateLogGroupDetails, LoggingManagement, CUSTOM_LOG_TYPE};

pub const LOG_GROUP_DESCRIPTION: &str = "Log group for ingesting WAF stage logs";

pub async fn ensure_log_group(
    client: &dyn LoggingManagement,
    compartment_id: &str,
    display_name: &str,
) -> Result<String> {
    let existing = client
        .list_log_groups(compartment_id, display_name)
        .await
        .context("listing log groups")?;
    if let Some(group) = existing.first() {
        return Ok(group.id.clone());
    }

    info!(log_group = display_name, "creating log group");
    client
        .create_log_group(&CreateLogGroupDetails {
            compartment_id: compartment_id.to_string(),
            display_name: display_name.to_string(),
            description: LOG_GROUP_DESCRIPTION.to_string(),
        })
        .await
        .context("creating log group")?;

    let created = client
        .list_log_groups(compartment_id, display_name)
        .await
        .context("listing log groups after create")?;
    match created.first() {
        Some(group) => Ok(group.id.clone()),
        None => bail!("log group `{display_name}` not visible after creation"),
    }
}

pub async fn ensure_log_stream(
    client: &dyn LoggingManagement,
    log_group_id: &str,
    display_name: &str,
) -> Result<String> {
    let existing = client
        .list_logs(log_group_id, CUSTOM_LOG_TYPE, display_name)
        .await
        .context("listing logs")?;
    if let Some(log) = existing.first() {
        return Ok(log.id.clone());
    }

    info!(log = display_name, "creating custom log");
    client
        .create_log(
            log_group_id,
            &CreateLogDetails {
                display_name: display_name.to_string(),
                log_type: CUSTOM_LOG_TYPE.to_string(),
            },
        )
        .await
        .context("creating custom log")?;

    let created = client
        .list_logs(log_group_id, CUSTOM_LOG_TYPE, display_name)
        .await
        .context("listing logs after create")?;
    match created.first() {
        Some(log) => Ok(log.id.clone()),
        None => bail!("custom log `{display_name}` not visible after creation"),
    }
}
