//! The graph database client collaborator (spec.md §6). Out of scope to
//! implement against a real database — this module defines the trait
//! boundary the upsert executor (C4) calls through. `graph::memory`
//! provides an in-memory implementation used by the crate's own tests and
//! by operators without a live graph endpoint.

use crate::error::ExecutorError;
use crate::graph::model::{ConnectionKey, ConnectionObservation, Label, Props, RelType};

/// A request to upsert a `CONNECTED` edge, carrying the conditional
/// aggregate-merge semantics of spec.md §4.3. `observation` is `None` in
/// reduced-fidelity mode: only the edge's existence and key properties are
/// guaranteed, with no aggregate properties touched.
#[derive(Debug, Clone)]
pub struct ConnectionUpsert {
    pub src_label: Label,
    pub src: String,
    pub dst: String,
    pub key: ConnectionKey,
    pub observation: Option<ConnectionObservation>,
}

/// The three operations spec.md §6 grants the core against the graph:
/// `create_node`, `new_relationship`, and (here, typed rather than a raw
/// parameterized string) the conditional `CONNECTED` upsert.
pub trait GraphClient: Send {
    /// Ensure a node with label/name exists; on creation, set `props`. On
    /// match, existing properties are never overwritten (spec.md §4.4).
    fn create_node(&mut self, label: Label, name: &str, props: Props) -> Result<(), ExecutorError>;

    /// Ensure a (no-property, or key-only) relationship of `rel` from
    /// `(src_label, src)` to `(dst_label, dst)` exists.
    fn new_relationship(
        &mut self,
        rel: RelType,
        src_label: Label,
        src: &str,
        dst_label: Label,
        dst: &str,
    ) -> Result<(), ExecutorError>;

    /// Ensure a `CONNECTED` edge matching `request.key` exists between
    /// `request.src` and `request.dst`, applying the create/merge rule of
    /// spec.md §4.3 when `request.observation` is `Some`.
    fn upsert_connection(&mut self, request: ConnectionUpsert) -> Result<(), ExecutorError>;
}
