//! Graph entity and relationship shapes (spec.md §3).

use std::collections::BTreeMap;

/// Node labels. `BTreeMap`-ordered properties throughout this module keep
/// executor calls deterministic, which matters for the idempotence property
/// in spec.md §8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    Ip,
    Mac,
    Ssid,
}

impl Label {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Ip => "IP",
            Label::Mac => "MAC",
            Label::Ssid => "SSID",
        }
    }
}

/// Relationship types (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelType {
    Assigned,
    Connected,
    ProbeResponse,
    Advertises,
    Probes,
}

impl RelType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RelType::Assigned => "ASSIGNED",
            RelType::Connected => "CONNECTED",
            RelType::ProbeResponse => "PROBE_RESPONSE",
            RelType::Advertises => "ADVERTISES",
            RelType::Probes => "PROBES",
        }
    }
}

/// Node/edge property bag. `serde_json::Value` covers the bool/string/
/// number properties spec.md §3 calls for without a bespoke value type.
pub type Props = BTreeMap<String, serde_json::Value>;

/// The distinguishing key of a `CONNECTED` edge (spec.md §3): `port` is
/// `None` for MAC-to-MAC connections, `Some(-1)` for an IP connection with
/// no observed destination port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionKey {
    pub port: Option<i64>,
    pub protocol: String,
}

impl ConnectionKey {
    /// The synthetic `name` property the source keys connections by
    /// (`"{port}/{protocol}"` for IP, `"{protocol}"` for MAC).
    #[must_use]
    pub fn name(&self) -> String {
        match self.port {
            Some(port) => format!("{port}/{}", self.protocol),
            None => self.protocol.clone(),
        }
    }
}

/// One packet's contribution to a `CONNECTED` edge's aggregate properties,
/// present only in full-fidelity mode (spec.md §4.3).
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionObservation {
    pub timestamp: f64,
    pub length: u64,
    pub service: String,
    pub service_layer: i64,
}
