use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::pool::PoolMember;

/// What an executor is currently running. Each executor runs exactly one
/// routine at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutineKind {
    /// Connected but waiting for work.
    #[default]
    Idle,
    /// Hosting the rotating raid queue.
    RotatingRaid,
    /// Sweeping overworld spawns for target encounters.
    EncounterScan,
    /// Reading den seeds for requesters.
    SeedCheck,
}

impl RoutineKind {
    #[must_use]
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl std::fmt::Display for RoutineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::RotatingRaid => "rotating raid",
            Self::EncounterScan => "encounter scan",
            Self::SeedCheck => "seed check",
        };
        f.write_str(label)
    }
}

/// Cheap-to-clone, non-owning handle to a running executor.
///
/// The process driving the console connection owns the executor itself;
/// handles expose identity plus a shared routine cell. All clones of a
/// handle share that cell, so a routine transition made by the executor
/// loop is immediately visible to every holder.
#[derive(Debug, Clone)]
pub struct ExecutorHandle {
    id: String,
    name: String,
    routine: Arc<RwLock<RoutineKind>>,
}

impl ExecutorHandle {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            routine: Arc::new(RwLock::new(RoutineKind::Idle)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn routine(&self) -> RoutineKind {
        *self.routine.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_routine(&self, routine: RoutineKind) {
        *self.routine.write().unwrap_or_else(|e| e.into_inner()) = routine;
    }
}

impl PoolMember for ExecutorHandle {
    fn pool_id(&self) -> &str {
        &self.id
    }
}
