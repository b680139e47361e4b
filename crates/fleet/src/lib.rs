//! Executor fleet membership and aggregate state queries.
//!
//! A hub tracks the bot executors currently attached to it through a
//! [`Pool`] of cheap [`ExecutorHandle`] clones. The pool never owns an
//! executor; it only observes identity and the current routine.

pub mod executor;
pub mod pool;

pub use {
    executor::{ExecutorHandle, RoutineKind},
    pool::{Pool, PoolMember},
};
