//! Application core: merge, publication and presentation.

pub mod merge;
pub mod publish;
pub mod records;
pub mod render;

pub use merge::{merge_day, MergeInputs, MergeOutcome, MergedPick};
pub use publish::{PublishReport, Publisher};
