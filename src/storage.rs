// Object Storage access
//
// Objects are fetched through OpenDAL's S3 service pointed at the
// namespace-scoped S3 compatibility endpoint. The whole object is read into
// memory in fixed 1 MiB chunks; there is no partial-read recovery, a stream
// interruption fails the fetch.

use anyhow::{Context, Result};
use async_trait::async_trait;
use opendal::Operator;

use crate::config::FunctionConfig;

pub const FETCH_CHUNK_BYTES: u64 = 1024 * 1024;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn fetch(&self, namespace: &str, bucket: &str, object_name: &str) -> Result<Vec<u8>>;
}

/// OpenDAL-backed store; one operator per (namespace, bucket) pair.
///
/// Credentials come from the ambient environment, never from configuration.
pub struct OpenDalObjectStore {
    region: String,
    endpoint_override: Option<String>,
}

impl OpenDalObjectStore {
    pub fn new(config: &FunctionConfig) -> Self {
        Self {
            region: config.region.clone(),
            endpoint_override: config.object_storage_endpoint.clone(),
        }
    }

    fn operator(&self, namespace: &str, bucket: &str) -> Result<Operator> {
        let endpoint = match &self.endpoint_override {
            Some(ep) => ep.clone(),
            None => format!(
                "https://{namespace}.compat.objectstorage.{region}.oraclecloud.com",
                region = self.region
            ),
        };

        let builder = opendal::services::S3::default()
            .bucket(bucket)
            .region(&self.region)
            .endpoint(&endpoint);

        Ok(Operator::new(builder)
            .context("building object storage operator")?
            .finish())
    }
}

#[async_trait]
impl ObjectStore for OpenDalObjectStore {
    async fn fetch(&self, namespace: &str, bucket: &str, object_name: &str) -> Result<Vec<u8>> {
        let op = self.operator(namespace, bucket)?;
        fetch_chunked(&op, object_name).await
    }
}

/// Read the full object in fixed-size chunks and concatenate in memory.
pub async fn fetch_chunked(op: &Operator, object_name: &str) -> Result<Vec<u8>> {
    let meta = op
        .stat(object_name)
        .await
        .context("fetching object metadata")?;
    let len = meta.content_length();
    let reader = op
        .reader(object_name)
        .await
        .context("opening object for read")?;

    let mut data = Vec::with_capacity(len as usize);
    let mut offset = 0u64;
    while offset < len {
        let end = (offset + FETCH_CHUNK_BYTES).min(len);
        let chunk = reader
            .read(offset..end)
            .await
            .context("reading object chunk")?;
        data.extend_from_slice(&chunk.to_bytes());
        offset = end;
    }
    Ok(data)
}
