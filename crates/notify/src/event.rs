/// Rich-content presentation for a result announcement.
#[derive(Debug, Clone, Default)]
pub struct EmbedSpec {
    pub title: String,
    pub description: String,
    /// `0xRRGGBB` accent color hint.
    pub color: Option<u32>,
    pub thumbnail_url: Option<String>,
}

/// Binary attachment carried by a result announcement.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A result payload fanned out to every registered results channel.
///
/// Ephemeral: constructed by a producer, dispatched, discarded.
#[derive(Debug, Clone)]
pub struct ResultEvent {
    pub embed: EmbedSpec,
    pub attachment: Option<Attachment>,
}

impl ResultEvent {
    pub fn embed_only(embed: EmbedSpec) -> Self {
        Self {
            embed,
            attachment: None,
        }
    }

    pub fn with_attachment(embed: EmbedSpec, attachment: Attachment) -> Self {
        Self {
            embed,
            attachment: Some(attachment),
        }
    }

    /// The file to upload, if any.
    ///
    /// An empty byte sequence counts as "no attachment": the event goes
    /// out content-only. The choice is made here, per event, so every
    /// channel sees the same shape.
    pub fn file_upload(&self) -> Option<&Attachment> {
        self.attachment.as_ref().filter(|a| !a.bytes.is_empty())
    }
}
