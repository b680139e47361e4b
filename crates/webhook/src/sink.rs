use {
    anyhow::Result,
    async_trait::async_trait,
    secrecy::ExposeSecret,
    serde_json::{Value, json},
    tracing::debug,
};

use botswarm_notify::{Attachment, EmbedSpec, RichSink, TextSink};

use crate::config::WebhookConfig;

/// Sends notification payloads to one webhook endpoint.
pub struct WebhookSink {
    http: reqwest::Client,
    config: WebhookConfig,
}

impl WebhookSink {
    pub fn new(config: WebhookConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Share one HTTP client across sinks for connection reuse.
    pub fn with_client(http: reqwest::Client, config: WebhookConfig) -> Self {
        Self { http, config }
    }

    fn text_payload(&self, text: &str) -> Value {
        let mut payload = serde_json::Map::new();
        payload.insert("content".into(), Value::String(text.into()));
        if let Some(username) = &self.config.username {
            payload.insert("username".into(), Value::String(username.clone()));
        }
        Value::Object(payload)
    }

    fn rich_payload(&self, embed: &EmbedSpec) -> Value {
        let mut payload = serde_json::Map::new();
        payload.insert("embeds".into(), json!([embed_json(embed)]));
        if let Some(username) = &self.config.username {
            payload.insert("username".into(), Value::String(username.clone()));
        }
        Value::Object(payload)
    }

    async fn post_json(&self, payload: &Value) -> Result<()> {
        let resp = self
            .http
            .post(self.config.url.expose_secret())
            .json(payload)
            .send()
            .await?;
        fail_on_status(resp).await
    }
}

#[async_trait]
impl TextSink for WebhookSink {
    async fn send_text(&self, text: &str) -> Result<()> {
        debug!(bytes = text.len(), "posting text to webhook");
        self.post_json(&self.text_payload(text)).await
    }
}

#[async_trait]
impl RichSink for WebhookSink {
    async fn send_rich(&self, file: Option<&Attachment>, embed: &EmbedSpec) -> Result<()> {
        let payload = self.rich_payload(embed);
        match file {
            None => self.post_json(&payload).await,
            Some(attachment) => {
                debug!(
                    file = attachment.file_name.as_str(),
                    bytes = attachment.bytes.len(),
                    "posting file to webhook"
                );
                let form = reqwest::multipart::Form::new()
                    .text("payload_json", payload.to_string())
                    .part(
                        "files[0]",
                        reqwest::multipart::Part::bytes(attachment.bytes.clone())
                            .file_name(attachment.file_name.clone()),
                    );
                let resp = self
                    .http
                    .post(self.config.url.expose_secret())
                    .multipart(form)
                    .send()
                    .await?;
                fail_on_status(resp).await
            },
        }
    }
}

fn embed_json(embed: &EmbedSpec) -> Value {
    let mut e = serde_json::Map::new();
    e.insert("title".into(), Value::String(embed.title.clone()));
    e.insert(
        "description".into(),
        Value::String(embed.description.clone()),
    );
    if let Some(color) = embed.color {
        e.insert("color".into(), json!(color));
    }
    if let Some(url) = &embed.thumbnail_url {
        e.insert("thumbnail".into(), json!({ "url": url }));
    }
    Value::Object(e)
}

async fn fail_on_status(resp: reqwest::Response) -> Result<()> {
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("webhook send failed ({status}): {body}");
    }
    Ok(())
}
