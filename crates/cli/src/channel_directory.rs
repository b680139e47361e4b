//! Durable channel registrations, persisted through the config store.

use async_trait::async_trait;

use {
    botswarm_config::{BotswarmConfig, ChannelEntry},
    botswarm_notify::{ChannelDirectory, Error, Result, StoredChannel},
};

/// Which persisted channel list a directory operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ChannelCategory {
    /// Plain operational echoes.
    Echo,
    /// Structured result payloads.
    Results,
}

impl ChannelCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Echo => "echo",
            Self::Results => "results",
        }
    }

    fn entries(self, config: &BotswarmConfig) -> &Vec<ChannelEntry> {
        match self {
            Self::Echo => &config.channels.echo,
            Self::Results => &config.channels.results,
        }
    }

    fn entries_mut(self, config: &mut BotswarmConfig) -> &mut Vec<ChannelEntry> {
        match self {
            Self::Echo => &mut config.channels.echo,
            Self::Results => &mut config.channels.results,
        }
    }
}

/// [`ChannelDirectory`] backed by the botswarm config file.
///
/// Every operation is load-modify-save over the discovered config, so the
/// directory reflects whatever an operator last wrote, including edits
/// made by hand between invocations.
pub struct ConfigChannelDirectory {
    category: ChannelCategory,
}

impl ConfigChannelDirectory {
    pub fn new(category: ChannelCategory) -> Self {
        Self { category }
    }

    fn save(&self, config: &BotswarmConfig) -> Result<()> {
        botswarm_config::save_config(config)
            .map(|_| ())
            .map_err(|e| Error::directory("saving channel config", e))
    }
}

#[async_trait]
impl ChannelDirectory for ConfigChannelDirectory {
    async fn list(&self) -> Result<Vec<StoredChannel>> {
        let config = botswarm_config::discover_and_load();
        Ok(self.category.entries(&config).iter().map(from_entry).collect())
    }

    async fn add(&self, channel: StoredChannel) -> Result<()> {
        let entry = to_entry(channel)?;
        let mut config = botswarm_config::discover_and_load();
        let entries = self.category.entries_mut(&mut config);
        entries.retain(|e| e.id != entry.id);
        entries.push(entry);
        self.save(&config)
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let mut config = botswarm_config::discover_and_load();
        self.category.entries_mut(&mut config).retain(|e| e.id != id);
        self.save(&config)
    }

    async fn clear(&self) -> Result<()> {
        let mut config = botswarm_config::discover_and_load();
        self.category.entries_mut(&mut config).clear();
        self.save(&config)
    }
}

fn to_entry(channel: StoredChannel) -> Result<ChannelEntry> {
    let sink = match channel.config {
        serde_json::Value::Object(map) => map,
        serde_json::Value::Null => serde_json::Map::new(),
        _ => return Err(Error::invalid_input("channel sink settings must be a table")),
    };
    Ok(ChannelEntry {
        id: channel.id,
        name: channel.name,
        comment: channel.comment,
        sink,
    })
}

fn from_entry(entry: &ChannelEntry) -> StoredChannel {
    StoredChannel {
        id: entry.id.clone(),
        name: entry.name.clone(),
        config: serde_json::Value::Object(entry.sink.clone()),
        comment: entry.comment.clone(),
    }
}
