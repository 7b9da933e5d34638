//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`picks`] — Builders for picks in all three source shapes.
//! - [`sources`] — [`ScriptedSources`](sources::ScriptedSources), a
//!   scriptable [`PickSources`](crate::port::PickSources) implementation.
//! - [`stores`] — In-memory snapshot/audit/artifact/circuit stores.
//! - [`notify`] — [`RecordingNotifier`](notify::RecordingNotifier).

pub mod notify;
pub mod picks;
pub mod sources;
pub mod stores;
