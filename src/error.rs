//! Crate error taxonomy (spec.md §7). Optional/absent data is never an
//! error — these types exist only for the failure classes the spec
//! actually names: executor failures and pipeline-level aborts.

use thiserror::Error;

/// Reserved for frame-extraction failures. Extraction never fails per
/// spec.md §4.1 ("never fails on missing layers") — this type exists so
/// the extractor's signature can grow a fallible path later without a
/// breaking change, matching the teacher's habit of one error enum per
/// concern even when currently uninhabited.
#[derive(Debug, Error)]
pub enum ExtractError {}

/// The two executor failure classes named in spec.md §7.
#[derive(Debug, Error, Clone)]
pub enum ExecutorError {
    #[error("transient graph executor failure: {0}")]
    Transient(String),
    #[error("permanent graph executor failure: {0}")]
    Permanent(String),
}

/// Pipeline-level failures surfaced to the driver (spec.md §7).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("packet {packet_index}: {source}")]
    Executor {
        packet_index: u64,
        #[source]
        source: ExecutorError,
    },
    #[error("capture source failure: {0}")]
    Capture(String),
    #[error("cancelled after packet {packet_index}")]
    Cancelled { packet_index: u64 },
}
