use {async_trait::async_trait, serde::Serialize};

use crate::Result;

/// A durably-stored channel registration.
#[derive(Debug, Clone, Serialize)]
pub struct StoredChannel {
    pub id: String,
    pub name: String,
    /// Platform-specific sink configuration (e.g. webhook endpoint).
    pub config: serde_json::Value,
    /// Provenance note ("added by …"), surfaced in diagnostics only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Durable storage for channel registrations.
///
/// Registrations must survive restarts, but the core does not define the
/// storage format; implementations live with whatever owns configuration
/// persistence and are called by the command layer alongside the registry
/// mutation they mirror.
#[async_trait]
pub trait ChannelDirectory: Send + Sync {
    async fn list(&self) -> Result<Vec<StoredChannel>>;
    async fn add(&self, channel: StoredChannel) -> Result<()>;
    async fn remove(&self, id: &str) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}
