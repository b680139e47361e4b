//! Webhook channel adapter.
//!
//! Implements both delivery capabilities over a plain HTTP webhook of the
//! Discord-compatible shape: JSON `content` posts for text, `embeds` for
//! rich payloads, multipart `payload_json` + file part when an event
//! carries an attachment.

pub mod config;
pub mod sink;

pub use {config::WebhookConfig, sink::WebhookSink};
