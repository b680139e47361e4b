//! Rebuild the in-memory channel registries from persisted registrations.

use std::sync::Arc;

use tracing::{debug, warn};

use {
    botswarm_config::{BotswarmConfig, ChannelEntry},
    botswarm_notify::{NotifyRegistry, RegisterOutcome, RichSink, TextSink},
    botswarm_webhook::{WebhookConfig, WebhookSink},
};

/// How the startup restore went, per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub echo: usize,
    pub results: usize,
    pub skipped: usize,
}

/// Register every persisted channel into its registry.
///
/// Entries whose sink settings fail to parse are skipped with a warning;
/// one bad registration must not keep the rest of the fleet silent.
pub fn restore_channels(
    config: &BotswarmConfig,
    echo: &NotifyRegistry,
    results: &NotifyRegistry,
) -> RestoreReport {
    let http = reqwest::Client::new();
    let mut skipped = 0;
    let echo_count = restore_into(&config.channels.echo, echo, &http, &mut skipped);
    let results_count = restore_into(&config.channels.results, results, &http, &mut skipped);
    RestoreReport {
        echo: echo_count,
        results: results_count,
        skipped,
    }
}

fn restore_into(
    entries: &[ChannelEntry],
    registry: &NotifyRegistry,
    http: &reqwest::Client,
    skipped: &mut usize,
) -> usize {
    let mut restored = 0;
    for entry in entries {
        let settings = serde_json::Value::Object(entry.sink.clone());
        let webhook: WebhookConfig = match serde_json::from_value(settings) {
            Ok(config) => config,
            Err(error) => {
                warn!(
                    channel = entry.id.as_str(),
                    %error,
                    "skipping channel with invalid sink settings"
                );
                *skipped += 1;
                continue;
            },
        };
        let sink = Arc::new(WebhookSink::with_client(http.clone(), webhook));
        let outcome = registry.register(
            entry.id.clone(),
            entry.name.clone(),
            Arc::clone(&sink) as Arc<dyn TextSink>,
            sink as Arc<dyn RichSink>,
        );
        if outcome == RegisterOutcome::Registered {
            debug!(
                channel = entry.id.as_str(),
                name = entry.name.as_str(),
                "channel restored"
            );
            restored += 1;
        }
    }
    restored
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str) -> ChannelEntry {
        let mut sink = serde_json::Map::new();
        sink.insert(
            "url".into(),
            serde_json::Value::String("https://example.test/hook".into()),
        );
        ChannelEntry {
            id: id.into(),
            name: name.into(),
            comment: None,
            sink,
        }
    }

    #[tokio::test]
    async fn restore_registers_persisted_channels() {
        let mut config = BotswarmConfig::default();
        config.channels.echo.push(entry("123", "#ops"));
        config.channels.results.push(entry("456", "#raids"));

        let echo = NotifyRegistry::new();
        let results = NotifyRegistry::new();
        let report = restore_channels(&config, &echo, &results);

        assert_eq!(report, RestoreReport {
            echo: 1,
            results: 1,
            skipped: 0,
        });
        assert!(echo.contains("123"));
        assert!(results.contains("456"));
    }

    #[tokio::test]
    async fn invalid_sink_settings_do_not_block_the_rest() {
        let mut config = BotswarmConfig::default();
        config.channels.echo.push(entry("123", "#ops"));
        let mut bad = entry("999", "#broken");
        bad.sink.clear();
        config.channels.echo.push(bad);

        let echo = NotifyRegistry::new();
        let results = NotifyRegistry::new();
        let report = restore_channels(&config, &echo, &results);

        assert_eq!(report.echo, 1);
        assert_eq!(report.skipped, 1);
        assert!(echo.contains("123"));
        assert!(!echo.contains("999"));
    }

    #[tokio::test]
    async fn duplicate_persisted_identity_registers_once() {
        let mut config = BotswarmConfig::default();
        config.channels.echo.push(entry("123", "#ops"));
        config.channels.echo.push(entry("123", "#ops-copy"));

        let echo = NotifyRegistry::new();
        let results = NotifyRegistry::new();
        let report = restore_channels(&config, &echo, &results);

        assert_eq!(report.echo, 1);
        assert_eq!(echo.len(), 1);
    }
}
