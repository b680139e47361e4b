use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use {rand::Rng, tracing::debug};

use {
    botswarm_config::{BotswarmConfig, EmbedColor},
    botswarm_fleet::{ExecutorHandle, Pool},
    botswarm_notify::{Broadcaster, EmbedSpec, NotifyRegistry, ResultEvent},
};

/// Central coordination point for one fleet.
///
/// The hub never starts executors; external code registers whatever it
/// runs into the pool and removes it on shutdown.
pub struct Hub {
    config: Arc<BotswarmConfig>,
    fleet: Pool<ExecutorHandle>,
    echo: Broadcaster,
    results: Broadcaster,
}

impl Hub {
    pub fn new(config: Arc<BotswarmConfig>) -> Self {
        Self::with_registries(
            config,
            Arc::new(NotifyRegistry::new()),
            Arc::new(NotifyRegistry::new()),
        )
    }

    /// Compose a hub around pre-built registries, shared with whatever
    /// command surface registers and unregisters channels.
    pub fn with_registries(
        config: Arc<BotswarmConfig>,
        echo: Arc<NotifyRegistry>,
        results: Arc<NotifyRegistry>,
    ) -> Self {
        Self {
            config,
            fleet: Pool::new(),
            echo: Broadcaster::new(echo),
            results: Broadcaster::new(results),
        }
    }

    pub fn config(&self) -> &BotswarmConfig {
        &self.config
    }

    /// Executors currently attached to this hub.
    pub fn fleet(&self) -> &Pool<ExecutorHandle> {
        &self.fleet
    }

    /// Broadcaster for plain operational echoes.
    pub fn echo(&self) -> &Broadcaster {
        &self.echo
    }

    /// Broadcaster for structured result payloads.
    pub fn results(&self) -> &Broadcaster {
        &self.results
    }

    /// True when raid-type coordinated work can begin: at least one
    /// executor is running a non-idle routine.
    ///
    /// Uncached; every call re-evaluates a fresh fleet snapshot.
    pub fn raid_ready(&self) -> bool {
        !self.fleet.all(|b| b.routine().is_idle())
    }

    /// Operator announcement: wrap `text` in a presentation embed and
    /// broadcast it to the echo channels, fire-and-forget.
    pub fn announce(&self, text: &str) {
        debug!(hub = self.config.hub.name.as_str(), "broadcasting announcement");
        self.echo.announce_result(self.announcement(text));
    }

    fn announcement(&self, text: &str) -> ResultEvent {
        let announce = &self.config.hub.announce;
        let color = if announce.random_color {
            let idx = rand::rng().random_range(0..EmbedColor::ALL.len());
            EmbedColor::ALL[idx]
        } else {
            announce.color
        };
        let sent_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        ResultEvent::embed_only(EmbedSpec {
            title: "Important Announcement!".into(),
            description: format!("## {text}\n\n**Sent: <t:{sent_at}:F>**"),
            color: Some(color.rgb()),
            thumbnail_url: announce.thumbnail_url.clone(),
        })
    }
}
