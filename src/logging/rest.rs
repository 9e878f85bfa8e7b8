// REST transport for the Logging management and ingestion APIs
//
// Management plane: {logging-endpoint}/20200531
// Ingestion plane:  {ingestion-endpoint}/20200831
//
// Authentication headers come from the injected RequestSigner; the client
// itself never touches ambient credentials.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::auth::RequestSigner;
use crate::config::FunctionConfig;

use super::{
    CreateLogDetails, CreateLogGroupDetails, LogIngestion, LoggingManagement, PutLogsDetails,
    ResourceSummary,
};

const MANAGEMENT_API_VERSION: &str = "20200531";
const INGESTION_API_VERSION: &str = "20200831";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct RestLoggingClient {
    http: reqwest::Client,
    management_base: String,
    ingestion_base: String,
    signer: Arc<dyn RequestSigner>,
}

impl RestLoggingClient {
    pub fn new(config: &FunctionConfig, signer: Arc<dyn RequestSigner>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building HTTP client")?;

        Ok(Self {
            http,
            management_base: format!(
                "{}/{MANAGEMENT_API_VERSION}",
                config.logging_endpoint.trim_end_matches('/')
            ),
            ingestion_base: format!(
                "{}/{INGESTION_API_VERSION}",
                config.ingestion_endpoint.trim_end_matches('/')
            ),
            signer,
        })
    }

    /// Sign, send, and require a 2xx status.
    async fn signed(&self, mut request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        for (name, value) in self.signer.auth_headers().await? {
            request = request.header(&name, &value);
        }

        let response = request.send().await.context("service request failed")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("service returned {status}: {body}"));
        }
        Ok(response)
    }
}

#[async_trait]
impl LoggingManagement for RestLoggingClient {
    async fn list_log_groups(
        &self,
        compartment_id: &str,
        display_name: &str,
    ) -> Result<Vec<ResourceSummary>> {
        let url = format!("{}/logGroups", self.management_base);
        debug!(%url, display_name, "listing log groups");
        let response = self
            .signed(self.http.get(&url).query(&[
                ("compartmentId", compartment_id),
                ("displayName", display_name),
            ]))
            .await?;
        response.json().await.context("parsing log group list")
    }

    async fn create_log_group(&self, details: &CreateLogGroupDetails) -> Result<()> {
        let url = format!("{}/logGroups", self.management_base);
        debug!(%url, display_name = %details.display_name, "creating log group");
        self.signed(self.http.post(&url).json(details)).await?;
        Ok(())
    }

    async fn list_logs(
        &self,
        log_group_id: &str,
        log_type: &str,
        display_name: &str,
    ) -> Result<Vec<ResourceSummary>> {
        let url = format!("{}/logGroups/{log_group_id}/logs", self.management_base);
        debug!(%url, display_name, "listing logs");
        let response = self
            .signed(
                self.http
                    .get(&url)
                    .query(&[("logType", log_type), ("displayName", display_name)]),
            )
            .await?;
        response.json().await.context("parsing log list")
    }

    async fn create_log(&self, log_group_id: &str, details: &CreateLogDetails) -> Result<()> {
        let url = format!("{}/logGroups/{log_group_id}/logs", self.management_base);
        debug!(%url, display_name = %details.display_name, "creating log");
        self.signed(self.http.post(&url).json(details)).await?;
        Ok(())
    }
}

#[async_trait]
impl LogIngestion for RestLoggingClient {
    async fn put_logs(&self, log_id: &str, details: &PutLogsDetails) -> Result<()> {
        let url = format!("{}/logs/{log_id}/actions/push", self.ingestion_base);
        debug!(%url, "pushing logs");
        self.signed(self.http.post(&url).json(details)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ResourcePrincipalSigner;
    use crate::config::EntryTimeSource;
    use crate::logging::{ingest, LogEntry};
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> RestLoggingClient {
        let config = FunctionConfig {
            compartment_id: "ocid1.compartment.oc1..abc".to_string(),
            log_group_name: "waf-stg-log-group".to_string(),
            log_name: "waf-stg-log".to_string(),
            entry_time_source: EntryTimeSource::Ingestion,
            region: "us-ashburn-1".to_string(),
            logging_endpoint: server.base_url(),
            ingestion_endpoint: server.base_url(),
            object_storage_endpoint: None,
        };
        RestLoggingClient::new(&config, Arc::new(ResourcePrincipalSigner::new("test-token")))
            .unwrap()
    }

    #[tokio::test]
    async fn list_log_groups_encodes_query_and_auth() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/20200531/logGroups")
                    .query_param("compartmentId", "ocid1.compartment.oc1..abc")
                    .query_param("displayName", "waf-stg-log-group")
                    .header("authorization", "Bearer test-token");
                then.status(200).json_body(serde_json::json!([
                    { "id": "ocid1.loggroup.oc1..xyz", "displayName": "waf-stg-log-group" }
                ]));
            })
            .await;

        let client = client_for(&server);
        let groups = client
            .list_log_groups("ocid1.compartment.oc1..abc", "waf-stg-log-group")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "ocid1.loggroup.oc1..xyz");
    }

    #[tokio::test]
    async fn create_log_group_posts_details() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/20200531/logGroups")
                    .header("authorization", "Bearer test-token")
                    .json_body(serde_json::json!({
                        "compartmentId": "ocid1.compartment.oc1..abc",
                        "displayName": "waf-stg-log-group",
                        "description": "Log group for ingesting WAF stage logs"
                    }));
                then.status(202);
            })
            .await;

        let client = client_for(&server);
        client
            .create_log_group(&CreateLogGroupDetails {
                compartment_id: "ocid1.compartment.oc1..abc".to_string(),
                display_name: "waf-stg-log-group".to_string(),
                description: "Log group for ingesting WAF stage logs".to_string(),
            })
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn list_logs_scopes_to_group_and_type() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/20200531/logGroups/ocid1.loggroup.oc1..xyz/logs")
                    .query_param("logType", "CUSTOM")
                    .query_param("displayName", "waf-stg-log");
                then.status(200).json_body(serde_json::json!([
                    { "id": "ocid1.log.oc1..log", "displayName": "waf-stg-log" }
                ]));
            })
            .await;

        let client = client_for(&server);
        let logs = client
            .list_logs("ocid1.loggroup.oc1..xyz", "CUSTOM", "waf-stg-log")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(logs[0].id, "ocid1.log.oc1..log");
    }

    #[tokio::test]
    async fn put_logs_hits_the_push_action() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/20200831/logs/ocid1.log.oc1..log/actions/push")
                    .header("authorization", "Bearer test-token");
                then.status(200);
            })
            .await;

        let client = client_for(&server);
        let details = ingest::build_batch(
            vec![LogEntry {
                data: "status:200".to_string(),
                id: "id-1".to_string(),
                time: "2021-02-01T08:30:15.250Z".to_string(),
            }],
            "2021-02-01T09:00:00.000Z".to_string(),
        );
        client
            .put_logs("ocid1.log.oc1..log", &details)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/20200531/logGroups");
                then.status(404).body("NotAuthorizedOrNotFound");
            })
            .await;

        let client = client_for(&server);
        let err = client
            .list_log_groups("ocid1.compartment.oc1..abc", "waf-stg-log-group")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
