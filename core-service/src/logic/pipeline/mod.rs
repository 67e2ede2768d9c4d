//! Pipeline Module - the two-stage decision
//!
//! - `decision` - DecisionPipeline (evaluate / assess)
//! - `verdict` - Verdict and BinaryLabel
//! - `request` - FlowRequest (raw features + client + note)
//! - `batch` - JSON-lines evaluation for the offline classifier

pub mod batch;
pub mod decision;
pub mod request;
pub mod verdict;


// Re-export common types
pub use batch::{classify_line, classify_stream, BatchSummary};
pub use decision::DecisionPipeline;
pub use request::FlowRequest;
pub use verdict::{BinaryLabel, Refinement, Verdict};
