//! Concrete adapters behind the ports.

pub mod fs;
pub mod sqlite;

pub use fs::FsArtifactStore;
pub use sqlite::audit::SqliteAuditStore;
pub use sqlite::circuit::SqliteCircuitStore;
pub use sqlite::manual::SqliteManualPicks;
pub use sqlite::probe::SqliteAvailabilityProbe;
pub use sqlite::snapshot::SqliteSnapshotStore;
pub use sqlite::sources::SqliteSources;
