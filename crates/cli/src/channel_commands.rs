//! CLI subcommands for notification channel registration.

use {
    anyhow::Result,
    clap::{Args, Subcommand},
    serde_json::{Map, Value},
};

use botswarm_notify::{ChannelDirectory, StoredChannel};

use crate::channel_directory::{ChannelCategory, ConfigChannelDirectory};

#[derive(Subcommand)]
pub enum ChannelAction {
    /// Register a webhook channel.
    Add(AddArgs),
    /// Unregister a channel.
    Remove {
        /// Which delivery category the channel belongs to.
        #[arg(value_enum)]
        category: ChannelCategory,
        /// Channel identity (platform-level id).
        id: String,
    },
    /// Unregister every channel of a category.
    Clear {
        #[arg(value_enum)]
        category: ChannelCategory,
    },
    /// List registered channels.
    List,
}

#[derive(Args)]
pub struct AddArgs {
    /// Which delivery category the channel receives.
    #[arg(value_enum)]
    category: ChannelCategory,
    /// Channel identity (platform-level id).
    id: String,
    /// Human-readable channel name.
    name: String,
    /// Webhook endpoint URL.
    #[arg(long)]
    url: String,
    /// Override the sender name shown on delivered messages.
    #[arg(long)]
    username: Option<String>,
    /// Provenance note stored with the registration.
    #[arg(long)]
    comment: Option<String>,
}

pub async fn handle_channel(action: ChannelAction) -> Result<()> {
    match action {
        ChannelAction::Add(args) => add_channel(args).await,
        ChannelAction::Remove { category, id } => remove_channel(category, &id).await,
        ChannelAction::Clear { category } => clear_channels(category).await,
        ChannelAction::List => list_channels().await,
    }
}

async fn add_channel(args: AddArgs) -> Result<()> {
    let directory = ConfigChannelDirectory::new(args.category);
    if directory.list().await?.iter().any(|c| c.id == args.id) {
        println!("Channel '{}' is already registered.", args.id);
        return Ok(());
    }

    let mut sink = Map::new();
    sink.insert("url".into(), Value::String(args.url));
    if let Some(username) = args.username {
        sink.insert("username".into(), Value::String(username));
    }

    directory
        .add(StoredChannel {
            id: args.id.clone(),
            name: args.name,
            config: Value::Object(sink),
            comment: args.comment,
        })
        .await?;
    println!(
        "Registered {} channel '{}'. Restart the hub to apply.",
        args.category.label(),
        args.id
    );
    Ok(())
}

async fn remove_channel(category: ChannelCategory, id: &str) -> Result<()> {
    let directory = ConfigChannelDirectory::new(category);
    if !directory.list().await?.iter().any(|c| c.id == id) {
        println!("Channel '{id}' is not registered.");
        return Ok(());
    }
    directory.remove(id).await?;
    println!("Removed {} channel '{id}'.", category.label());
    Ok(())
}

async fn clear_channels(category: ChannelCategory) -> Result<()> {
    let directory = ConfigChannelDirectory::new(category);
    let count = directory.list().await?.len();
    directory.clear().await?;
    println!("Removed {count} {} channel(s).", category.label());
    Ok(())
}

async fn list_channels() -> Result<()> {
    for category in [ChannelCategory::Echo, ChannelCategory::Results] {
        let channels = ConfigChannelDirectory::new(category).list().await?;
        println!("{} channels:", category.label());
        if channels.is_empty() {
            println!("  (none)");
            continue;
        }
        for channel in channels {
            match &channel.comment {
                Some(comment) => println!("  {} — {} ({comment})", channel.id, channel.name),
                None => println!("  {} — {}", channel.id, channel.name),
            }
        }
    }
    Ok(())
}
