use std::{
    collections::{HashMap, hash_map::Entry},
    sync::RwLock,
};

use tracing::debug;

/// Identity used to key a member within a [`Pool`].
pub trait PoolMember {
    fn pool_id(&self) -> &str;
}

/// Thread-safe, unordered collection of members keyed by identity.
///
/// Writers hold the lock only long enough to mutate the map. Readers work
/// on snapshots, so iteration never blocks a writer and never observes a
/// mutation mid-pass. Add/remove of the same identity are linearizable;
/// no ordering is guaranteed across different identities.
pub struct Pool<M> {
    members: RwLock<HashMap<String, M>>,
}

impl<M> Default for Pool<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Pool<M> {
    pub fn new() -> Self {
        Self {
            members: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.members
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<M: PoolMember + Clone> Pool<M> {
    /// Insert a member if its identity is absent.
    ///
    /// Adding an identity that is already present is a no-op, never an
    /// error. Returns whether the member was inserted.
    pub fn add(&self, member: M) -> bool {
        let mut members = self.members.write().unwrap_or_else(|e| e.into_inner());
        match members.entry(member.pool_id().to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                debug!(id = slot.key().as_str(), "pool member added");
                slot.insert(member);
                true
            },
        }
    }

    /// Remove the member with the given identity, if present.
    ///
    /// Removing an absent identity is a no-op.
    pub fn remove(&self, id: &str) -> Option<M> {
        let removed = self
            .members
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id);
        if removed.is_some() {
            debug!(id, "pool member removed");
        }
        removed
    }

    /// Point-in-time copy of the membership, safe to iterate with no lock
    /// held.
    pub fn snapshot(&self) -> Vec<M> {
        self.members
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect()
    }

    /// True when every member of a snapshot satisfies the predicate.
    /// Vacuously true for an empty pool.
    pub fn all(&self, predicate: impl Fn(&M) -> bool) -> bool {
        self.snapshot().iter().all(predicate)
    }

    /// True when at least one member of a snapshot satisfies the predicate.
    pub fn any(&self, predicate: impl Fn(&M) -> bool) -> bool {
        self.snapshot().iter().any(predicate)
    }
}
