//! Picklock - pick-locking and publication engine for sports player-prop
//! betting picks.
//!
//! This crate merges three independently-updated pick sources (a volatile
//! algorithmic signal feed, a previously-published "locked" snapshot and
//! manually-curated overrides) into one stable ranked list, persists it as
//! the new locked snapshot and renders the public JSON artifact the web
//! frontend consumes.
//!
//! # Architecture
//!
//! Hexagonal, with the merge engine at the center:
//!
//! - **[`domain`]** - Warehouse-agnostic types: picks, locked records,
//!   manual overrides, audit records, circuit state
//! - **[`engine`]** - The merge algorithm, publish pipeline, aggregation
//!   and artifact rendering
//! - **[`breaker`]** - Per-key circuit breakers: a pipeline variant with
//!   upstream-availability auto-reset, and a call-wrapping service variant
//! - **[`port`]** - Trait contracts for sources, stores, artifacts and
//!   notifications
//! - **[`adapter`]** - SQLite (Diesel) and filesystem implementations
//! - **[`app`]** - Composition root used by the CLI
//!
//! # Guarantees
//!
//! - A pick that has been published never silently disappears from the
//!   public list; picks the algorithm drops are retained and marked.
//! - Premium ("ultra") status is frozen once a pick's game has started.
//! - Ranks in the published list are always a contiguous 1..N sequence.
//!
//! # Example
//!
//! ```no_run
//! use picklock::app::App;
//! use picklock::config::Config;
//! use picklock::domain::TriggerSource;
//!
//! # async fn run() -> picklock::error::Result<()> {
//! let app = App::new(Config::default())?;
//! let report = app
//!     .publish("2026-08-05".parse().unwrap(), TriggerSource::Scheduled)
//!     .await?;
//! println!("published {} picks", report.summary.total);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod breaker;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
