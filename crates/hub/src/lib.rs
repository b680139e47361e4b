//! Fleet coordination hub.
//!
//! Composes the shared configuration, the executor pool, and the two
//! notification registries (operational echoes + result payloads) into
//! one ownership root, and derives the aggregate readiness signal that
//! higher-level scheduling consults before starting raid-type work.

pub mod hub;

pub use hub::Hub;
