//! C1: the frame extractor. Decodes an opaque [`Frame`] into a normalized
//! [`PacketRecord`] (spec.md §4.1). Never fails on missing layers — absence
//! is data, not an error.

use crate::cache::{CacheKind, RecencyCache};
use crate::model::{Frame, IpEndpoints, MacAddr, MacEndpoints, OuiByRole, PacketRecord, Ports};
use crate::oui::OuiLookup;

/// Layer names that never carry a meaningful service identity (spec.md
/// §3): wrapper layers one step inside HTTP/whatever actually matters.
const IGNORED_SERVICE_LAYERS: [&str; 3] = ["data-text-lines", "data", "mime_multipart"];

/// Extract a [`PacketRecord`] from `frame`.
///
/// `oui` resolves MAC manufacturer strings; `cache` is consulted (via
/// [`RecencyCache::check`], which never admits) to avoid paying for an OUI
/// lookup on a MAC already resolved recently — purely a performance
/// optimization per spec.md §4.2, never load-bearing for correctness.
pub fn extract(frame: &Frame, oui: &dyn OuiLookup, cache: &mut RecencyCache) -> PacketRecord {
    let protocol = resolve_protocol(frame);
    let mac = resolve_macs(frame);
    let oui_by_role = resolve_oui(&mac, oui, cache);
    let ip = resolve_ip(frame);
    let ports = resolve_ports(frame);
    let (service, service_layer) = resolve_service(frame);
    let ssid = frame
        .wlan_mgt_tags()
        .and_then(crate::model::dot11::extract_ssid);
    let frame_type = frame
        .wlan()
        .map_or(crate::model::FrameType::Beacon, |header| {
            crate::model::FrameType::from_fc_type_subtype(header.fc_type_subtype)
        });

    PacketRecord {
        protocol,
        ip,
        mac,
        oui: oui_by_role,
        ports,
        timestamp: frame.timestamp,
        length: frame.length,
        service,
        service_layer,
        ssid,
        frame_type,
    }
}

/// spec.md §3: `tcp`/`udp` if present anywhere, else the name of the first
/// post-IP (or post-link, when no IP layer) layer.
fn resolve_protocol(frame: &Frame) -> String {
    for layer in &frame.layers {
        let name = layer.name();
        if name == "udp" || name == "tcp" {
            return name.to_string();
        }
    }
    let ip_idx = frame
        .layers
        .iter()
        .position(|l| matches!(l.name(), "ip" | "ipv6"));
    if let Some(idx) = ip_idx {
        if let Some(next) = frame.layers.get(idx + 1) {
            return next.name().to_string();
        }
        return frame.layers[idx].name().to_string();
    }
    if let Some(next) = frame.layers.get(1) {
        return next.name().to_string();
    }
    frame
        .layers
        .first()
        .map_or_else(|| "unknown".to_string(), |l| l.name().to_string())
}

/// spec.md §4.1: 802.11 overrides Ethernet MACs when both are present; the
/// `ta == sa` / `ra == da` suppression already happened when the `Dot11Header`
/// was constructed (see `model::dot11::Dot11Header::with_duplicate_addresses_suppressed`).
fn resolve_macs(frame: &Frame) -> MacEndpoints {
    if let Some(header) = frame.wlan() {
        MacEndpoints {
            src: header.sa,
            dst: header.da,
            tra: header.ta,
            rec: header.ra,
        }
    } else if let Some((src, dst)) = frame.eth() {
        MacEndpoints {
            src: Some(src),
            dst: Some(dst),
            tra: None,
            rec: None,
        }
    } else {
        MacEndpoints::default()
    }
}

fn resolve_oui(mac: &MacEndpoints, oui: &dyn OuiLookup, cache: &mut RecencyCache) -> OuiByRole {
    let lookup = |role_mac: Option<MacAddr>| -> Option<String> {
        let mac = role_mac?;
        if cache.check(CacheKind::Mac, &mac.to_string()) {
            // Recently resolved (or at least recently seen); skip the
            // lookup. The projector re-derives manufacturer only on
            // node creation, so a stale/missing value here is harmless.
            return None;
        }
        oui.query(&mac)
    };
    OuiByRole {
        src: lookup(mac.src),
        dst: lookup(mac.dst),
        tra: lookup(mac.tra),
        rec: lookup(mac.rec),
    }
}

fn resolve_ip(frame: &Frame) -> IpEndpoints {
    match frame.ip() {
        Some((src, dst)) => IpEndpoints {
            src: Some(src),
            dst: Some(dst),
        },
        None => IpEndpoints::default(),
    }
}

fn resolve_ports(frame: &Frame) -> Ports {
    match frame.ports() {
        Some((src, dst)) => Ports {
            src: Some(src),
            dst: Some(dst),
        },
        None => Ports::default(),
    }
}

/// spec.md §3/§9: priority service names first (service_layer fixed at
/// 999); otherwise the deepest non-ignored layer, walking from the
/// innermost layer outward but never considering the outermost (link)
/// layer. The ordinal is simply that layer's 0-based index — "larger means
/// deeper" falls out for free since later layers sit at higher indices.
fn resolve_service(frame: &Frame) -> (Option<String>, i64) {
    for priority in ["http", "https", "ftp"] {
        if frame.has_layer(priority) {
            return (Some(priority.to_string()), 999);
        }
    }
    let len = frame.layers.len();
    for idx in (1..len).rev() {
        let name = frame.layers[idx].name();
        if !IGNORED_SERVICE_LAYERS.contains(&name) {
            return (Some(name.to_string()), idx as i64);
        }
    }
    (Some("unknown".to_string()), -(len as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::dot11::Dot11Header;
    use crate::model::Layer;
    use crate::oui::NullOuiLookup;

    fn mac(s: &str) -> MacAddr {
        s.parse().unwrap()
    }

    #[test]
    fn s1_single_tcp_packet_ipv4() {
        let frame = Frame::new(
            vec![
                Layer::Eth {
                    src: mac("aa:aa:aa:aa:aa:aa"),
                    dst: mac("bb:bb:bb:bb:bb:bb"),
                },
                Layer::Ip {
                    src: "10.0.0.1".parse().unwrap(),
                    dst: "10.0.0.2".parse().unwrap(),
                },
                Layer::Tcp {
                    src_port: 1000,
                    dst_port: 80,
                },
                Layer::Other("http".into()),
            ],
            100.0,
            60,
        );
        let mut cache = RecencyCache::new(50);
        let record = extract(&frame, &NullOuiLookup, &mut cache);
        assert_eq!(record.protocol, "tcp");
        assert_eq!(record.ip.src, Some("10.0.0.1".parse().unwrap()));
        assert_eq!(record.ip.dst, Some("10.0.0.2".parse().unwrap()));
        assert_eq!(record.mac.src, Some(mac("aa:aa:aa:aa:aa:aa")));
        assert_eq!(record.ports.dst, Some(80));
        assert_eq!(record.service.as_deref(), Some("http"));
        assert_eq!(record.service_layer, 999);
    }

    #[test]
    fn service_falls_back_to_deepest_non_ignored_layer() {
        let frame = Frame::new(
            vec![
                Layer::Eth {
                    src: mac("aa:aa:aa:aa:aa:aa"),
                    dst: mac("bb:bb:bb:bb:bb:bb"),
                },
                Layer::Ip {
                    src: "10.0.0.1".parse().unwrap(),
                    dst: "10.0.0.2".parse().unwrap(),
                },
                Layer::Udp {
                    src_port: 5353,
                    dst_port: 5353,
                },
                Layer::Other("dns".into()),
                Layer::Other("data".into()),
            ],
            1.0,
            40,
        );
        let mut cache = RecencyCache::new(50);
        let record = extract(&frame, &NullOuiLookup, &mut cache);
        assert_eq!(record.service.as_deref(), Some("dns"));
        assert_eq!(record.service_layer, 3);
    }

    #[test]
    fn wlan_overrides_ethernet_macs_and_suppresses_duplicate_ta_ra() {
        let sa = mac("11:11:11:11:11:11");
        let da = mac("22:22:22:22:22:22");
        let frame = Frame::new(
            vec![
                Layer::Eth {
                    src: mac("aa:aa:aa:aa:aa:aa"),
                    dst: mac("bb:bb:bb:bb:bb:bb"),
                },
                Layer::Wlan(
                    Dot11Header {
                        sa: Some(sa),
                        da: Some(da),
                        ta: Some(sa),
                        ra: Some(da),
                        fc_type_subtype: 0x0008,
                    }
                    .with_duplicate_addresses_suppressed(),
                ),
            ],
            5.0,
            20,
        );
        let mut cache = RecencyCache::new(50);
        let record = extract(&frame, &NullOuiLookup, &mut cache);
        assert_eq!(record.mac.src, Some(sa));
        assert_eq!(record.mac.dst, Some(da));
        assert_eq!(record.mac.tra, None);
        assert_eq!(record.mac.rec, None);
    }

    #[test]
    fn s3_beacon_with_ssid() {
        let sa = mac("cc:cc:cc:cc:cc:cc");
        let mut tag_body = vec![crate::model::dot11::TAG_SSID, 4];
        tag_body.extend_from_slice(b"home");
        let frame = Frame::new(
            vec![
                Layer::Wlan(Dot11Header {
                    sa: Some(sa),
                    da: None,
                    ta: None,
                    ra: None,
                    fc_type_subtype: 0x0008,
                }),
                Layer::WlanMgt {
                    tags: crate::model::dot11::parse_management_tags(&tag_body),
                },
            ],
            2.0,
            50,
        );
        let mut cache = RecencyCache::new(50);
        let record = extract(&frame, &NullOuiLookup, &mut cache);
        assert_eq!(record.ssid.as_deref(), Some("home"));
        assert_eq!(record.frame_type, crate::model::FrameType::Beacon);
    }
}
