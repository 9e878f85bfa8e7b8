// Object Storage upload event
//
// Shape emitted by the Events service for object-created notifications:
// {"data": {"resourceName": ..., "additionalDetails": {"bucketName": ..., "namespace": ...}}}
// Any missing key at any level is a fatal invocation error.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectUploadEvent {
    data: EventData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventData {
    resource_name: String,
    additional_details: AdditionalDetails,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdditionalDetails {
    bucket_name: String,
    namespace: String,
}

impl ObjectUploadEvent {
    pub fn parse(payload: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(payload)
    }

    pub fn object_name(&self) -> &str {
        &self.data.resource_name
    }

    pub fn bucket_name(&self) -> &str {
        &self.data.additional_details.bucket_name
    }

    pub fn namespace(&self) -> &str {
        &self.data.additional_details.namespace
    }
}
