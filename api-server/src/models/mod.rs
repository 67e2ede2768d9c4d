//! Request / response models

pub mod stats;
pub mod submission;

pub use stats::{RequestStats, StatsSnapshot};
pub use submission::FlowSubmission;
