//! Configuration loading, validation, and env substitution.
//!
//! Config files: `botswarm.toml`, `botswarm.yaml`, or `botswarm.json`,
//! searched in `./` then `~/.config/botswarm/`.
//!
//! Supports `${ENV_VAR}` substitution in the raw file text.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{
        clear_config_dir, config_dir, discover_and_load, find_or_default_config_path, load_config,
        save_config, set_config_dir,
    },
    schema::{AnnounceConfig, BotswarmConfig, ChannelEntry, ChannelsConfig, EmbedColor, HubConfig},
};
