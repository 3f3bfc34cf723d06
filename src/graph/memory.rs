//! In-memory reference [`GraphClient`]. Used by the crate's own test suite
//! to check the properties of spec.md §8 without a live database, and
//! usable by operators as a dry-run target.

use std::collections::HashMap;

use crate::error::ExecutorError;
use crate::graph::client::{ConnectionUpsert, GraphClient};
use crate::graph::model::{ConnectionKey, Label, Props, RelType};

/// Aggregate state of one `CONNECTED` edge. All fields are `None`/zero
/// until the first full-fidelity observation; reduced-fidelity mode never
/// populates them (spec.md §4.3).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionRecord {
    pub first_seen: Option<f64>,
    pub last_seen: Option<f64>,
    pub data_size: u64,
    pub count: u64,
    pub service: Option<String>,
    pub service_layer: Option<i64>,
}

type NodeKey = (Label, String);
type EdgeKey = (RelType, String, String);
type ConnectionMapKey = (Label, String, String, ConnectionKey);

/// A plain, in-process property graph.
#[derive(Debug, Default, PartialEq)]
pub struct InMemoryGraph {
    nodes: HashMap<NodeKey, Props>,
    edges: HashMap<EdgeKey, ()>,
    connections: HashMap<ConnectionMapKey, ConnectionRecord>,
}

impl InMemoryGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn node_props(&self, label: Label, name: &str) -> Option<&Props> {
        self.nodes.get(&(label, name.to_string()))
    }

    #[must_use]
    pub fn has_node(&self, label: Label, name: &str) -> bool {
        self.node_props(label, name).is_some()
    }

    #[must_use]
    pub fn has_relationship(&self, rel: RelType, src: &str, dst: &str) -> bool {
        self.edges
            .contains_key(&(rel, src.to_string(), dst.to_string()))
    }

    #[must_use]
    pub fn connection(
        &self,
        src_label: Label,
        src: &str,
        dst: &str,
        key: &ConnectionKey,
    ) -> Option<&ConnectionRecord> {
        self.connections
            .get(&(src_label, src.to_string(), dst.to_string(), key.clone()))
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len() + self.connections.len()
    }
}

impl GraphClient for InMemoryGraph {
    fn create_node(&mut self, label: Label, name: &str, props: Props) -> Result<(), ExecutorError> {
        // write-once on creation; on match, never overwrite (spec.md §4.4).
        self.nodes
            .entry((label, name.to_string()))
            .or_insert(props);
        Ok(())
    }

    fn new_relationship(
        &mut self,
        rel: RelType,
        _src_label: Label,
        src: &str,
        _dst_label: Label,
        dst: &str,
    ) -> Result<(), ExecutorError> {
        self.edges
            .entry((rel, src.to_string(), dst.to_string()))
            .or_insert(());
        Ok(())
    }

    fn upsert_connection(&mut self, request: ConnectionUpsert) -> Result<(), ExecutorError> {
        let map_key = (
            request.src_label,
            request.src.clone(),
            request.dst.clone(),
            request.key.clone(),
        );
        let record = self.connections.entry(map_key).or_default();
        if let Some(obs) = request.observation {
            record.first_seen = Some(record.first_seen.map_or(obs.timestamp, |fs| fs.min(obs.timestamp)));
            record.last_seen = Some(record.last_seen.map_or(obs.timestamp, |ls| ls.max(obs.timestamp)));
            record.data_size += obs.length;
            record.count += 1;
            if obs.service_layer > record.service_layer.unwrap_or(i64::MIN) {
                record.service = Some(obs.service);
                record.service_layer = Some(obs.service_layer);
            }
        }
        Ok(())
    }
}
