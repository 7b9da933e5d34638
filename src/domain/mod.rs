//! Warehouse-agnostic domain types for picks and circuits.

mod audit;
mod circuit;
mod game;
mod manual;
mod pick;
mod published;

// Core pick types
pub use game::GameId;
pub use manual::ManualPick;
pub use pick::{
    normalize_ultra_text, Grading, Pick, PickResult, PickSource, Recommendation,
    MANUAL_SYSTEM_SOURCE,
};
pub use published::PublishedPick;

// Publication bookkeeping
pub use audit::{ExportAuditRecord, MergeSummary, TriggerSource};

// Circuit breaker state
pub use circuit::{CircuitState, CircuitStatus};
