// Request signing for Logging service calls
//
// The function authenticates with its resource principal: the platform
// mounts a session token (RPST) into the environment, either as the token
// itself or as an absolute path to a token file. The signer is injected
// into each client instead of living in ambient global state.

use anyhow::{Context, Result};
use async_trait::async_trait;

pub const RPST_ENV_KEY: &str = "OCI_RESOURCE_PRINCIPAL_RPST";

#[async_trait]
pub trait RequestSigner: Send + Sync {
    /// Headers to attach to an outgoing service request.
    async fn auth_headers(&self) -> Result<Vec<(String, String)>>;
}

/// Signer backed by the platform-provided resource-principal session token.
pub struct ResourcePrincipalSigner {
    source: TokenSource,
}

enum TokenSource {
    Literal(String),
    File(std::path::PathBuf),
}

impl ResourcePrincipalSigner {
    pub fn from_env() -> Result<Self> {
        let raw = std::env::var(RPST_ENV_KEY)
            .with_context(|| format!("{RPST_ENV_KEY} is not set; resource principal unavailable"))?;
        Ok(Self::new(&raw))
    }

    /// A leading `/` means the platform handed us a token file path.
    pub fn new(raw: &str) -> Self {
        let source = if raw.starts_with('/') {
            TokenSource::File(raw.into())
        } else {
            TokenSource::Literal(raw.to_string())
        };
        Self { source }
    }

    fn token(&self) -> Result<String> {
        match &self.source {
            TokenSource::Literal(token) => Ok(token.clone()),
            TokenSource::File(path) => std::fs::read_to_string(path)
                .map(|t| t.trim().to_string())
                .with_context(|| format!("failed to read session token from {}", path.display())),
        }
    }
}

#[async_trait]
impl RequestSigner for ResourcePrincipalSigner {
    async fn auth_headers(&self) -> Result<Vec<(String, String)>> {
        let token = self.token()?;
        Ok(vec![("Authorization".to_string(), format!("Bearer {token}"))])
    }
}
