use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use tracing::debug;

use crate::sink::{RichSink, TextSink};

/// Outcome of a registration attempt. Re-registering an identity is a
/// recoverable condition reported as status, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered,
    AlreadyRegistered,
}

/// Outcome of an unregistration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnregisterOutcome {
    Removed,
    NotRegistered,
}

/// Result of the most recent delivery to a channel. Diagnostic only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { attempts: u32 },
    Failed { attempts: u32, error: String },
}

/// Identity + name pair for diagnostics.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ChannelInfo {
    pub id: String,
    pub name: String,
}

/// A registered text-delivery function and the identity it belongs to.
#[derive(Clone)]
pub struct TextForwarder {
    pub channel_id: String,
    pub sink: Arc<dyn TextSink>,
}

/// A registered rich-delivery function and the identity it belongs to.
#[derive(Clone)]
pub struct RichForwarder {
    pub channel_id: String,
    pub sink: Arc<dyn RichSink>,
}

struct ChannelEntry {
    name: String,
    last_delivery: Option<DeliveryOutcome>,
}

/// Map and forwarder lists mutate together under one lock, so they can
/// never diverge — a registration racing a clear-all resolves to either
/// fully-registered-then-cleared or not-yet-visible.
#[derive(Default)]
struct Inner {
    entries: HashMap<String, ChannelEntry>,
    text_forwarders: Vec<TextForwarder>,
    rich_forwarders: Vec<RichForwarder>,
}

/// Registry of notification channels for one delivery category.
///
/// A hub owns two of these: one for plain operational echoes, one for
/// structured result payloads. A channel identity is unique within a
/// registry and may appear in either, both, or neither.
#[derive(Default)]
pub struct NotifyRegistry {
    inner: Mutex<Inner>,
}

impl NotifyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel with its two delivery capabilities.
    ///
    /// The sinks are appended to the forwarder lists, so broadcast call
    /// sites pick the new channel up with no changes on their side. An
    /// already-present identity leaves the registry untouched.
    pub fn register(
        &self,
        id: impl Into<String>,
        name: impl Into<String>,
        text: Arc<dyn TextSink>,
        rich: Arc<dyn RichSink>,
    ) -> RegisterOutcome {
        let id = id.into();
        let mut inner = self.lock();
        if inner.entries.contains_key(&id) {
            return RegisterOutcome::AlreadyRegistered;
        }
        debug!(channel = id.as_str(), "channel registered");
        inner.entries.insert(id.clone(), ChannelEntry {
            name: name.into(),
            last_delivery: None,
        });
        inner.text_forwarders.push(TextForwarder {
            channel_id: id.clone(),
            sink: text,
        });
        inner.rich_forwarders.push(RichForwarder {
            channel_id: id,
            sink: rich,
        });
        RegisterOutcome::Registered
    }

    /// Remove a channel and its forwarder-list members.
    ///
    /// Unregistering an absent identity is a no-op on existing entries.
    pub fn unregister(&self, id: &str) -> UnregisterOutcome {
        let mut inner = self.lock();
        if inner.entries.remove(id).is_none() {
            return UnregisterOutcome::NotRegistered;
        }
        inner.text_forwarders.retain(|f| f.channel_id != id);
        inner.rich_forwarders.retain(|f| f.channel_id != id);
        debug!(channel = id, "channel unregistered");
        UnregisterOutcome::Removed
    }

    /// Clear every entry and every forwarder in one critical section.
    /// Returns how many channels were removed.
    pub fn unregister_all(&self) -> usize {
        let mut inner = self.lock();
        let removed = inner.entries.len();
        inner.entries.clear();
        inner.text_forwarders.clear();
        inner.rich_forwarders.clear();
        if removed > 0 {
            debug!(removed, "all channels unregistered");
        }
        removed
    }

    /// Identity + name pairs for diagnostics, in no particular order.
    pub fn list(&self) -> Vec<ChannelInfo> {
        self.lock()
            .entries
            .iter()
            .map(|(id, entry)| ChannelInfo {
                id: id.clone(),
                name: entry.name.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().entries.contains_key(id)
    }

    /// Update the diagnostic last-delivery cache for a channel.
    ///
    /// Unknown identities are dropped silently: the channel may have
    /// unregistered while its delivery task was still in flight.
    pub fn record_delivery(&self, id: &str, outcome: DeliveryOutcome) {
        if let Some(entry) = self.lock().entries.get_mut(id) {
            entry.last_delivery = Some(outcome);
        }
    }

    /// Most recent delivery outcome for a channel, if any.
    pub fn last_delivery(&self, id: &str) -> Option<DeliveryOutcome> {
        self.lock()
            .entries
            .get(id)
            .and_then(|e| e.last_delivery.clone())
    }

    /// Clone-snapshot of the text forwarder list for lock-free iteration.
    pub fn text_forwarders(&self) -> Vec<TextForwarder> {
        self.lock().text_forwarders.clone()
    }

    /// Clone-snapshot of the rich forwarder list for lock-free iteration.
    pub fn rich_forwarders(&self) -> Vec<RichForwarder> {
        self.lock().rich_forwarders.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
