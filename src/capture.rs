//! Capture-source glue (spec.md §1: an external collaborator, out of scope
//! to design in depth, but needed to produce real [`Frame`]s). Wraps
//! `pcap::Capture` for offline files and live interfaces and decodes bytes
//! into the tagged-union [`Frame`] the extractor (C1) consumes, via
//! `etherparse` for Ethernet/IP/TCP/UDP and `model::dot11` for 802.11
//! management frames.
//!
//! Simplifications (acceptable for glue, not for the graph logic itself):
//! no radiotap header stripping, no 4-address or QoS control fields, and
//! application-layer identification is a well-known-port guess rather than
//! a real dissector.

use std::net::IpAddr;
use std::path::Path;

use etherparse::{LaxPacketHeaders, LinkHeader, NetHeaders, TransportHeader};
use pcap::{Active, Capture as PcapCapture, Device, Offline};
use tracing::warn;

use crate::error::PipelineError;
use crate::model::dot11::{parse_management_tags, Dot11Header};
use crate::model::mac::MacAddr;
use crate::model::{Frame, Layer};

/// Where to read packets from (spec.md §6 `file`/`live` subcommands).
pub enum Source {
    File(std::path::PathBuf),
    Live(String),
}

/// An open capture, either replaying a file or reading a live interface.
pub enum Capture {
    Offline(PcapCapture<Offline>),
    Active(PcapCapture<Active>),
}

/// The outcome of polling a capture once.
pub enum CaptureEvent {
    Frame(Frame),
    /// A read timed out with no packet available (live captures only); the
    /// caller should check for cancellation and poll again.
    Timeout,
    /// The capture source is exhausted (offline files only).
    Eof,
}

impl Capture {
    pub fn open(source: &Source) -> Result<Self, PipelineError> {
        match source {
            Source::File(path) => Self::open_file(path),
            Source::Live(interface) => Self::open_live(interface),
        }
    }

    fn open_file(path: &Path) -> Result<Self, PipelineError> {
        PcapCapture::from_file(path)
            .map(Capture::Offline)
            .map_err(|err| PipelineError::Capture(err.to_string()))
    }

    fn open_live(interface: &str) -> Result<Self, PipelineError> {
        let device = Device::list()
            .map_err(|err| PipelineError::Capture(err.to_string()))?
            .into_iter()
            .find(|d| d.name == interface)
            .ok_or_else(|| PipelineError::Capture(format!("no such interface: {interface}")))?;
        let capture = PcapCapture::from_device(device)
            .map_err(|err| PipelineError::Capture(err.to_string()))?
            .promisc(true)
            .timeout(1000)
            .open()
            .map_err(|err| PipelineError::Capture(err.to_string()))?;
        Ok(Capture::Active(capture))
    }

    pub fn next_event(&mut self) -> CaptureEvent {
        let result = match self {
            Capture::Offline(cap) => cap.next_packet(),
            Capture::Active(cap) => cap.next_packet(),
        };
        match result {
            Ok(packet) => {
                let timestamp = packet.header.ts.tv_sec as f64
                    + f64::from(packet.header.ts.tv_usec) / 1_000_000.0;
                let length = packet.header.len;
                let layers = decode_layers(packet.data);
                CaptureEvent::Frame(Frame::new(layers, timestamp, length))
            }
            Err(pcap::Error::NoMorePackets) => CaptureEvent::Eof,
            Err(pcap::Error::TimeoutExpired) => CaptureEvent::Timeout,
            Err(err) => {
                warn!(%err, "capture read failed, treating as end of source");
                CaptureEvent::Eof
            }
        }
    }
}

fn decode_layers(data: &[u8]) -> Vec<Layer> {
    if let Some(layers) = decode_dot11(data) {
        return layers;
    }
    decode_ethernet(data)
}

fn decode_ethernet(data: &[u8]) -> Vec<Layer> {
    let Ok(headers) = LaxPacketHeaders::from_ethernet(data) else {
        return Vec::new();
    };
    let mut layers = Vec::new();

    if let Some(LinkHeader::Ethernet2(eth)) = headers.link {
        layers.push(Layer::Eth {
            src: MacAddr::new(eth.source),
            dst: MacAddr::new(eth.destination),
        });
    }

    let mut ports = None;
    match headers.net {
        Some(NetHeaders::Ipv4(v4, _)) => layers.push(Layer::Ip {
            src: IpAddr::from(v4.source),
            dst: IpAddr::from(v4.destination),
        }),
        Some(NetHeaders::Ipv6(v6, _)) => layers.push(Layer::Ipv6 {
            src: IpAddr::from(v6.source),
            dst: IpAddr::from(v6.destination),
        }),
        _ => {}
    }

    match headers.transport {
        Some(TransportHeader::Tcp(tcp)) => {
            ports = Some((tcp.source_port, tcp.destination_port));
            layers.push(Layer::Tcp {
                src_port: tcp.source_port,
                dst_port: tcp.destination_port,
            });
        }
        Some(TransportHeader::Udp(udp)) => {
            ports = Some((udp.source_port, udp.destination_port));
            layers.push(Layer::Udp {
                src_port: udp.source_port,
                dst_port: udp.destination_port,
            });
        }
        _ => {}
    }

    if let Some((src_port, dst_port)) = ports {
        if let Some(name) = guess_application(src_port, dst_port) {
            layers.push(Layer::Other(name.to_string()));
        }
    }

    layers
}

const WELL_KNOWN_PORTS: &[(u16, &str)] = &[
    (80, "http"),
    (8080, "http"),
    (443, "https"),
    (21, "ftp"),
    (53, "dns"),
    (67, "dhcp"),
    (68, "dhcp"),
    (123, "ntp"),
    (22, "ssh"),
    (25, "smtp"),
    (110, "pop3"),
    (143, "imap"),
];

fn guess_application(src_port: u16, dst_port: u16) -> Option<&'static str> {
    WELL_KNOWN_PORTS
        .iter()
        .find(|(port, _)| *port == src_port || *port == dst_port)
        .map(|(_, name)| *name)
}

/// Minimal 802.11 frame control decode, gated on a bare minimum-length
/// management header; anything shorter or whose type field isn't
/// "management" is left to [`decode_ethernet`] (which will simply fail to
/// parse it, yielding no layers — `Frame::new` never errors on that).
fn decode_dot11(data: &[u8]) -> Option<Vec<Layer>> {
    if data.len() < 24 {
        return None;
    }
    let fc0 = data[0];
    let frame_type = (fc0 >> 2) & 0x3;
    if frame_type != 0 {
        return None; // not a management frame; let the ethernet path try.
    }
    let subtype = u16::from((fc0 >> 4) & 0xF);

    let ra = MacAddr::new(data[4..10].try_into().ok()?);
    let ta = MacAddr::new(data[10..16].try_into().ok()?);

    let header = Dot11Header {
        sa: Some(ta),
        da: Some(ra),
        ta: Some(ta),
        ra: Some(ra),
        fc_type_subtype: subtype,
    }
    .with_duplicate_addresses_suppressed();

    let mut layers = vec![Layer::Wlan(header)];

    let fixed_len = match subtype {
        4 => 0,      // probe request: no fixed fields
        5 | 8 => 12, // probe response / beacon: timestamp+interval+capability
        _ => return Some(layers),
    };
    let body_start = 24 + fixed_len;
    if data.len() > body_start {
        let tags = parse_management_tags(&data[body_start..]);
        layers.push(Layer::WlanMgt { tags });
    }
    Some(layers)
}
