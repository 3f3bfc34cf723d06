//! C3: the graph projector. Turns one [`PacketRecord`] into the minimal,
//! ordered set of upsert [`Intent`]s the executor (C4) must apply (spec.md
//! §4.3). Projection never touches a `GraphClient` directly — it only
//! decides *what* to upsert, consulting the recency cache (C2) to elide
//! intents whose target the cache already admitted recently.

use crate::cache::{pair_key, CacheKind, RecencyCache};
use crate::graph::{ConnectionKey, ConnectionObservation, ConnectionUpsert, Label, Props, RelType};
use crate::model::packet_record::OuiByRole;
use crate::model::{FrameType, PacketRecord};

/// Whether connection upserts carry per-packet aggregate observations
/// (spec.md §4.3). Reduced fidelity is the forced mode for live captures
/// (spec.md §6); full fidelity is the default for offline files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fidelity {
    Full,
    Reduced,
}

/// One upsert the executor must apply. Node/simple-edge intents are
/// idempotent no-ops on a repeat (spec.md §4.4); [`Intent::UpsertConnection`]
/// always runs, since its aggregate merge is per-packet by definition.
#[derive(Debug, Clone)]
pub enum Intent {
    UpsertNode {
        label: Label,
        name: String,
        props: Props,
    },
    UpsertSimpleEdge {
        rel: RelType,
        src_label: Label,
        src: String,
        dst_label: Label,
        dst: String,
    },
    UpsertConnection(ConnectionUpsert),
}

/// Project `record` into its ordered intent list, gating node/simple-edge
/// intents on `cache` (spec.md §4.2/§4.3). The order is fixed: IP nodes, MAC
/// nodes, `ASSIGNED` edges, the connection (IP, MAC, or `PROBE_RESPONSE`),
/// then SSID/`ADVERTISES`/`PROBES`.
#[must_use]
pub fn project(record: &PacketRecord, fidelity: Fidelity, cache: &mut RecencyCache) -> Vec<Intent> {
    let mut intents = Vec::new();

    emit_ip_nodes(record, cache, &mut intents);
    emit_mac_nodes(record, cache, &mut intents);
    emit_assigned_edges(record, cache, &mut intents);
    emit_connection(record, fidelity, cache, &mut intents);
    emit_ssid_and_advertisement(record, cache, &mut intents);

    intents
}

fn emit_ip_nodes(record: &PacketRecord, cache: &mut RecencyCache, out: &mut Vec<Intent>) {
    for addr in [record.ip.src, record.ip.dst].into_iter().flatten() {
        let name = addr.to_string();
        if cache.check_and_admit(CacheKind::Ip, &name) {
            continue;
        }
        let mut props = Props::new();
        props.insert(
            "multicast".to_string(),
            serde_json::json!(crate::multicast::ip_multicast(&addr)),
        );
        out.push(Intent::UpsertNode {
            label: Label::Ip,
            name,
            props,
        });
    }
}

fn emit_mac_nodes(record: &PacketRecord, cache: &mut RecencyCache, out: &mut Vec<Intent>) {
    for (role, mac) in record.mac.present() {
        let name = mac.to_string();
        if cache.check_and_admit(CacheKind::Mac, &name) {
            continue;
        }
        let mut props = Props::new();
        props.insert(
            "multicast".to_string(),
            serde_json::json!(crate::multicast::mac_multicast(&mac)),
        );
        if let Some(manufacturer) = oui_for_role(&record.oui, role) {
            props.insert("manufacturer".to_string(), serde_json::json!(manufacturer));
        }
        out.push(Intent::UpsertNode {
            label: Label::Mac,
            name,
            props,
        });
    }
}

fn oui_for_role<'a>(oui: &'a OuiByRole, role: &str) -> Option<&'a str> {
    match role {
        "src" => oui.src.as_deref(),
        "dst" => oui.dst.as_deref(),
        "tra" => oui.tra.as_deref(),
        "rec" => oui.rec.as_deref(),
        _ => None,
    }
}

fn emit_assigned_edges(record: &PacketRecord, cache: &mut RecencyCache, out: &mut Vec<Intent>) {
    let mut assign = |ip: Option<std::net::IpAddr>, mac: Option<crate::model::MacAddr>| {
        let (Some(ip), Some(mac)) = (ip, mac) else {
            return;
        };
        let ip_name = ip.to_string();
        let mac_name = mac.to_string();
        if cache.check_and_admit(CacheKind::Assign, &pair_key(&ip_name, &mac_name)) {
            return;
        }
        out.push(Intent::UpsertSimpleEdge {
            rel: RelType::Assigned,
            src_label: Label::Ip,
            src: ip_name,
            dst_label: Label::Mac,
            dst: mac_name,
        });
    };
    assign(record.ip.src, record.mac.src);
    assign(record.ip.dst, record.mac.dst);
}

fn emit_connection(
    record: &PacketRecord,
    fidelity: Fidelity,
    cache: &mut RecencyCache,
    out: &mut Vec<Intent>,
) {
    if record.frame_type == FrameType::ProbeResponse {
        emit_probe_response(record, cache, out);
        return;
    }

    if let (Some(src), Some(dst)) = (record.ip.src, record.ip.dst) {
        let key = ConnectionKey {
            port: Some(record.ports.dst.map_or(-1, i64::from)),
            protocol: record.protocol.clone(),
        };
        out.push(Intent::UpsertConnection(ConnectionUpsert {
            src_label: Label::Ip,
            src: src.to_string(),
            dst: dst.to_string(),
            key,
            observation: observation(record, fidelity),
        }));
        return;
    }

    // spec.md §4.3 rule 4: the 802.11 forwarding split. When `ta`/`ra` also
    // differ from `sa`/`da` (a relayed data frame), the direct src→dst pair
    // is never itself a connection — only the two hop edges are (spec.md §8
    // scenario S7).
    match (record.mac.src, record.mac.dst, record.mac.tra, record.mac.rec) {
        (Some(src), Some(dst), Some(tra), Some(rec)) => {
            emit_mac_connection(src, tra, record, fidelity, out);
            emit_mac_connection(rec, dst, record, fidelity, out);
        }
        (Some(src), Some(dst), _, _) => {
            emit_mac_connection(src, dst, record, fidelity, out);
        }
        _ => {}
    }
}

fn emit_mac_connection(
    src: crate::model::MacAddr,
    dst: crate::model::MacAddr,
    record: &PacketRecord,
    fidelity: Fidelity,
    out: &mut Vec<Intent>,
) {
    let key = ConnectionKey {
        port: None,
        protocol: record.protocol.clone(),
    };
    out.push(Intent::UpsertConnection(ConnectionUpsert {
        src_label: Label::Mac,
        src: src.to_string(),
        dst: dst.to_string(),
        key,
        observation: observation(record, fidelity),
    }));
}

/// `PROBE_RESPONSE` endpoints: the 802.11 ta/ra pair when present, else the
/// plain src/dst pair.
fn emit_probe_response(record: &PacketRecord, cache: &mut RecencyCache, out: &mut Vec<Intent>) {
    let endpoints = match (record.mac.tra, record.mac.rec) {
        (Some(tra), Some(rec)) => Some((tra, rec)),
        _ => match (record.mac.src, record.mac.dst) {
            (Some(src), Some(dst)) => Some((src, dst)),
            _ => None,
        },
    };
    let Some((src, dst)) = endpoints else {
        return;
    };
    let src_name = src.to_string();
    let dst_name = dst.to_string();
    if cache.check_and_admit(CacheKind::ProbeResponse, &pair_key(&src_name, &dst_name)) {
        return;
    }
    out.push(Intent::UpsertSimpleEdge {
        rel: RelType::ProbeResponse,
        src_label: Label::Mac,
        src: src_name,
        dst_label: Label::Mac,
        dst: dst_name,
    });
}

fn observation(record: &PacketRecord, fidelity: Fidelity) -> Option<ConnectionObservation> {
    match fidelity {
        Fidelity::Reduced => None,
        Fidelity::Full => Some(ConnectionObservation {
            timestamp: record.timestamp,
            length: u64::from(record.length),
            service: record.service.clone().unwrap_or_else(|| "unknown".to_string()),
            service_layer: record.service_layer,
        }),
    }
}

/// `ADVERTISES` (beacon) and `PROBES` (probe request) edges from the
/// frame's source MAC to its SSID (spec.md §4.1/§4.3). A `PROBE_RESPONSE`
/// frame never reaches here: it returns early out of [`emit_connection`]
/// and carries no SSID edge of its own.
fn emit_ssid_and_advertisement(record: &PacketRecord, cache: &mut RecencyCache, out: &mut Vec<Intent>) {
    let (Some(ssid), Some(src)) = (record.ssid.as_deref(), record.mac.src) else {
        return;
    };
    let rel = match record.frame_type {
        FrameType::Beacon => RelType::Advertises,
        FrameType::Probe => RelType::Probes,
        FrameType::ProbeResponse => return,
    };

    if !cache.check_and_admit(CacheKind::Ssid, ssid) {
        out.push(Intent::UpsertNode {
            label: Label::Ssid,
            name: ssid.to_string(),
            props: Props::new(),
        });
    }

    let src_name = src.to_string();
    let kind = match rel {
        RelType::Advertises => CacheKind::Advertises,
        RelType::Probes => CacheKind::Probes,
        _ => unreachable!("rel is Advertises or Probes by construction"),
    };
    if cache.check_and_admit(kind, &pair_key(&src_name, ssid)) {
        return;
    }
    out.push(Intent::UpsertSimpleEdge {
        rel,
        src_label: Label::Mac,
        src: src_name,
        dst_label: Label::Ssid,
        dst: ssid.to_string(),
    });
}
