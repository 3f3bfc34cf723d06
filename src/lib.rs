//! Projects packet captures into a property-graph database: normalizes each
//! frame into a [`model::PacketRecord`] (C1), elides redundant graph
//! mutations with a recency cache (C2), derives the minimal set of graph
//! upserts (C3), and applies them through a retrying executor (C4), all
//! driven end to end by one pipeline per capture source (C5).

pub mod cache;
pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod graph;
pub mod model;
pub mod multicast;
pub mod oui;
pub mod pipeline;
pub mod projector;
pub mod telemetry;

pub use error::{ExecutorError, ExtractError, PipelineError};
pub use model::PacketRecord;
