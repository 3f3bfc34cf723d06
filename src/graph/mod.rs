//! Everything downstream of frame extraction: the graph entity/relationship
//! model, the `GraphClient` collaborator trait, an in-memory reference
//! implementation, and the upsert executor (C4) that drives a client from
//! projector intents.

pub mod client;
pub mod executor;
pub mod memory;
pub mod model;

pub use client::{ConnectionUpsert, GraphClient};
pub use executor::{Executor, ExecutorConfig};
pub use memory::InMemoryGraph;
pub use model::{ConnectionKey, ConnectionObservation, Label, Props, RelType};
