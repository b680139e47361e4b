use {anyhow::Result, async_trait::async_trait};

use crate::event::{Attachment, EmbedSpec};

/// Plain-text delivery capability for one channel.
///
/// Implementations may fail arbitrarily (network, platform errors); the
/// broadcaster tolerates any failure and applies its own retry budget.
#[async_trait]
pub trait TextSink: Send + Sync {
    async fn send_text(&self, text: &str) -> Result<()>;
}

/// Rich/attachment delivery capability for one channel.
///
/// `file` is `Some` only when the event carries a non-empty attachment;
/// implementations send content-only otherwise.
#[async_trait]
pub trait RichSink: Send + Sync {
    async fn send_rich(&self, file: Option<&Attachment>, embed: &EmbedSpec) -> Result<()>;
}
