use {secrecy::Secret, serde::Deserialize};

/// Settings for one webhook destination.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Full webhook endpoint URL. Secret material: the path embeds the
    /// posting token, so it must never reach logs or diagnostics.
    pub url: Secret<String>,
    /// Override the sender name shown on delivered messages.
    #[serde(default)]
    pub username: Option<String>,
}
