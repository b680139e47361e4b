mod channel_commands;
mod channel_directory;
mod restore;

use std::sync::Arc;

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {botswarm_hub::Hub, botswarm_notify::NotifyRegistry};

#[derive(Parser)]
#[command(name = "botswarm", about = "Botswarm — console fleet coordination hub")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Custom config directory (overrides default ~/.config/botswarm/).
    #[arg(long, global = true, env = "BOTSWARM_CONFIG_DIR")]
    config_dir: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the hub in the foreground (default when no subcommand is provided).
    Run,
    /// Notification channel management.
    Channel {
        #[command(subcommand)]
        action: channel_commands::ChannelAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    // Apply the directory override before anything loads config.
    if let Some(ref dir) = cli.config_dir {
        botswarm_config::set_config_dir(dir.clone());
    }

    info!(version = env!("CARGO_PKG_VERSION"), "botswarm starting");

    match cli.command {
        None | Some(Commands::Run) => run_hub().await,
        Some(Commands::Channel { action }) => channel_commands::handle_channel(action).await,
    }
}

async fn run_hub() -> anyhow::Result<()> {
    let config = Arc::new(botswarm_config::discover_and_load());
    let echo = Arc::new(NotifyRegistry::new());
    let results = Arc::new(NotifyRegistry::new());

    let report = restore::restore_channels(&config, &echo, &results);
    info!(
        echo = report.echo,
        results = report.results,
        skipped = report.skipped,
        "channels restored from config"
    );

    let hub = Hub::with_registries(Arc::clone(&config), echo, results);
    hub.echo().echo(format!("{} hub online", config.hub.name));

    info!(hub = config.hub.name.as_str(), "hub running, Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    // Joined so the goodbye flushes before the runtime shuts down.
    let report = hub
        .echo()
        .echo_joined(format!("{} hub shutting down", config.hub.name))
        .await;
    info!(
        delivered = report.delivered,
        failed = report.failed,
        "hub stopped"
    );
    Ok(())
}
