//! Config schema types (hub identity, announcements, persisted channels).

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BotswarmConfig {
    pub hub: HubConfig,
    pub channels: ChannelsConfig,
}

/// Hub identity and announcement presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Display name used in announcements and logs.
    pub name: String,
    pub announce: AnnounceConfig,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            name: "botswarm".into(),
            announce: AnnounceConfig::default(),
        }
    }
}

/// Presentation settings for operator announcements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnounceConfig {
    /// Accent color for announcement embeds.
    pub color: EmbedColor,
    /// Pick a random accent color per announcement instead of `color`.
    pub random_color: bool,
    /// Thumbnail shown on announcement embeds.
    pub thumbnail_url: Option<String>,
}

/// Named accent colors understood by the notification platforms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedColor {
    #[default]
    Blue,
    Green,
    Red,
    Gold,
    Purple,
    Teal,
    Orange,
    Magenta,
    LightGrey,
    DarkGrey,
}

impl EmbedColor {
    pub const ALL: [Self; 10] = [
        Self::Blue,
        Self::Green,
        Self::Red,
        Self::Gold,
        Self::Purple,
        Self::Teal,
        Self::Orange,
        Self::Magenta,
        Self::LightGrey,
        Self::DarkGrey,
    ];

    /// `0xRRGGBB` value matching the platform palette.
    #[must_use]
    pub fn rgb(self) -> u32 {
        match self {
            Self::Blue => 0x3498DB,
            Self::Green => 0x2ECC71,
            Self::Red => 0xE74C3C,
            Self::Gold => 0xF1C40F,
            Self::Purple => 0x9B59B6,
            Self::Teal => 0x1ABC9C,
            Self::Orange => 0xE67E22,
            Self::Magenta => 0xE91E63,
            Self::LightGrey => 0x979C9F,
            Self::DarkGrey => 0x607D8B,
        }
    }
}

/// Persisted channel registrations, one list per delivery category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelsConfig {
    /// Channels receiving plain operational echoes.
    pub echo: Vec<ChannelEntry>,
    /// Channels receiving structured result payloads.
    pub results: Vec<ChannelEntry>,
}

/// One persisted channel registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelEntry {
    pub id: String,
    pub name: String,
    /// Provenance note ("added by … on …").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Platform-specific sink settings (webhook endpoint etc.), kept
    /// opaque so the schema does not depend on any one platform.
    #[serde(default)]
    pub sink: serde_json::Map<String, serde_json::Value>,
}
