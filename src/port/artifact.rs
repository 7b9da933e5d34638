//! Outbound port for public JSON artifacts.

use async_trait::async_trait;

use crate::error::Result;

/// Destination for rendered public payloads (object storage, or a local
/// export directory standing in for it).
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Publish `body` under `name`, replacing any previous version.
    async fn publish_json(&self, name: &str, body: &serde_json::Value) -> Result<()>;
}
