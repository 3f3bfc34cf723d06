//! The normalized per-packet record produced by the frame extractor (C1)
//! and consumed by the graph projector (C3). See spec.md §3.

use std::net::IpAddr;

use crate::model::dot11::FrameType;
use crate::model::mac::MacAddr;

/// The four MAC roles a frame may carry (spec.md §3). `tra`/`rec` are
/// already suppressed (set to `None`) when equal to `src`/`dst`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MacEndpoints {
    pub src: Option<MacAddr>,
    pub dst: Option<MacAddr>,
    pub tra: Option<MacAddr>,
    pub rec: Option<MacAddr>,
}

impl MacEndpoints {
    /// Iterate the four roles paired with their role name, skipping absent
    /// ones — the order the spec's emission rules expect (`src, dst, tra,
    /// rec`).
    pub fn present(&self) -> impl Iterator<Item = (&'static str, MacAddr)> + '_ {
        [
            ("src", self.src),
            ("dst", self.dst),
            ("tra", self.tra),
            ("rec", self.rec),
        ]
        .into_iter()
        .filter_map(|(role, mac)| mac.map(|mac| (role, mac)))
    }
}

/// `src`/`dst` network-layer addresses; both present or both absent
/// (spec.md §3).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IpEndpoints {
    pub src: Option<IpAddr>,
    pub dst: Option<IpAddr>,
}

/// Transport ports; `dst` defaults to `-1` only at the graph boundary
/// (spec.md §3) — here both are `None` when absent so the projector can
/// tell "no transport layer" from "port zero".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ports {
    pub src: Option<u16>,
    pub dst: Option<u16>,
}

/// Per-MAC-role manufacturer strings, resolved via the OUI lookup
/// collaborator. `None` for a role whose MAC is absent or unresolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OuiByRole {
    pub src: Option<String>,
    pub dst: Option<String>,
    pub tra: Option<String>,
    pub rec: Option<String>,
}

/// The normalized per-packet record described in spec.md §3.
#[derive(Debug, Clone, PartialEq)]
pub struct PacketRecord {
    pub protocol: String,
    pub ip: IpEndpoints,
    pub mac: MacEndpoints,
    pub oui: OuiByRole,
    pub ports: Ports,
    pub timestamp: f64,
    pub length: u32,
    /// `None` only for frames carrying no identifiable application layer at
    /// all (spec.md §3 always returns at least `"unknown"` in the source;
    /// we keep that as `Some("unknown")` for layered frames with no layers
    /// left to name, see `extractor::resolve_service`).
    pub service: Option<String>,
    pub service_layer: i64,
    pub ssid: Option<String>,
    pub frame_type: FrameType,
}
