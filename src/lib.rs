// Serverless WAF log shipper
//
// Triggered by an Object Storage upload event, the handler pulls the
// gzip-compressed WAF access log, reshapes each JSON line into a Logging
// ingestion entry and pushes the whole object as one batch. The destination
// log group and custom log are provisioned on first use.

use std::sync::Arc;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

pub mod auth;
pub mod config;
pub mod event;
pub mod logging;
pub mod pipeline;
pub mod response;
pub mod storage;
pub mod transform;

mod init;

use config::FunctionConfig;
use event::ObjectUploadEvent;
use logging::{LogIngestion, LoggingManagement};
use response::HandlerResponse;
use storage::ObjectStore;

/// Dependencies shared across invocations.
pub struct HandlerState {
    pub config: FunctionConfig,
    pub management: Arc<dyn LoggingManagement>,
    pub ingestion: Arc<dyn LogIngestion>,
    pub object_store: Arc<dyn ObjectStore>,
}

/// Handle one trigger event.
///
/// Trigger-parse failures fail the invocation. Pipeline failures are logged
/// and swallowed: the platform still receives the success body, so a broken
/// upload never takes the function itself down.
pub async fn handle_event(payload: Value, state: &HandlerState) -> Result<HandlerResponse, Error> {
    let event = ObjectUploadEvent::parse(&payload)?;
    info!(
        object = %event.object_name(),
        bucket = %event.bucket_name(),
        namespace = %event.namespace(),
        "processing object upload event"
    );

    match pipeline::run(&event, state).await {
        Ok(report) => info!(
            entries = report.entries_uploaded,
            log_id = %report.log_id,
            "pipeline completed"
        ),
        Err(err) => error!(
            stage = err.stage(),
            error = %err,
            "pipeline failed; reporting success to the platform"
        ),
    }

    Ok(HandlerResponse::success())
}

/// Runtime entry point: load configuration, build service clients and serve
/// events. Configuration or identity problems abort here, before any side
/// effect.
pub async fn run() -> Result<(), Error> {
    init::init_tracing();

    let config = FunctionConfig::load()?;
    let signer = Arc::new(auth::ResourcePrincipalSigner::from_env()?);
    let rest = Arc::new(logging::rest::RestLoggingClient::new(&config, signer)?);

    let state = Arc::new(HandlerState {
        object_store: Arc::new(storage::OpenDalObjectStore::new(&config)),
        management: rest.clone(),
        ingestion: rest,
        config,
    });

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let state = state.clone();
        async move {
            let (payload, _context) = event.into_parts();
            handle_event(payload, &state).await
        }
    }))
    .await
}
