//! Notification fan-out: events, channel registries, and the broadcaster.
//!
//! Producers push an event; the broadcaster snapshots the registry's
//! forwarder lists and delivers to every channel concurrently, each task
//! with its own bounded retry. One channel's failure never blocks or
//! fails another's, and the producer never waits unless it asks to.

pub mod broadcast;
pub mod error;
pub mod event;
pub mod registry;
pub mod sink;
pub mod store;

pub use {
    broadcast::{BroadcastReport, Broadcaster, RetryPolicy},
    error::{Error, Result},
    event::{Attachment, EmbedSpec, ResultEvent},
    registry::{
        ChannelInfo, DeliveryOutcome, NotifyRegistry, RegisterOutcome, RichForwarder,
        TextForwarder, UnregisterOutcome,
    },
    sink::{RichSink, TextSink},
    store::{ChannelDirectory, StoredChannel},
};
