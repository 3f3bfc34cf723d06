//! Tagged-union frame representation handed to the extractor (C1).
//!
//! Design note (spec.md §9): "model the frame as a tagged union of known
//! layer shapes plus an unknown layer with a name variant; extraction
//! becomes pattern matching over the layer stack." `Frame` is the boundary
//! type produced by the (out-of-scope) capture/decoder collaborator.

use std::net::IpAddr;

use crate::model::dot11::{Dot11Header, ManagementTag};
use crate::model::mac::MacAddr;

/// One layer of a decoded frame, outer (link layer) to inner (application).
#[derive(Debug, Clone)]
pub enum Layer {
    Eth { src: MacAddr, dst: MacAddr },
    Wlan(Dot11Header),
    WlanMgt { tags: Vec<ManagementTag> },
    Ip { src: IpAddr, dst: IpAddr },
    Ipv6 { src: IpAddr, dst: IpAddr },
    Tcp { src_port: u16, dst_port: u16 },
    Udp { src_port: u16, dst_port: u16 },
    /// Any other layer identified only by name: application protocols
    /// (`http`, `https`, `ftp`, `dns`, ...) and the ignorable wrapper
    /// layers named in spec.md §3 (`data-text-lines`, `data`,
    /// `mime_multipart`).
    Other(String),
}

impl Layer {
    /// The layer name as used throughout spec.md §3/§4 (`eth`, `wlan`,
    /// `wlan.mgt`, `ip`, `ipv6`, `tcp`, `udp`, or the `Other` name).
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Layer::Eth { .. } => "eth",
            Layer::Wlan(_) => "wlan",
            Layer::WlanMgt { .. } => "wlan.mgt",
            Layer::Ip { .. } => "ip",
            Layer::Ipv6 { .. } => "ipv6",
            Layer::Tcp { .. } => "tcp",
            Layer::Udp { .. } => "udp",
            Layer::Other(name) => name,
        }
    }
}

/// A fully decoded frame: its ordered layer stack, capture timestamp (as
/// floating-point seconds since epoch) and captured length in bytes.
#[derive(Debug, Clone)]
pub struct Frame {
    pub layers: Vec<Layer>,
    pub timestamp: f64,
    pub length: u32,
}

impl Frame {
    #[must_use]
    pub fn new(layers: Vec<Layer>, timestamp: f64, length: u32) -> Self {
        Self {
            layers,
            timestamp,
            length,
        }
    }

    #[must_use]
    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.iter().any(|l| l.name() == name)
    }

    #[must_use]
    pub fn eth(&self) -> Option<(MacAddr, MacAddr)> {
        self.layers.iter().find_map(|l| match l {
            Layer::Eth { src, dst } => Some((*src, *dst)),
            _ => None,
        })
    }

    #[must_use]
    pub fn wlan(&self) -> Option<&Dot11Header> {
        self.layers.iter().find_map(|l| match l {
            Layer::Wlan(header) => Some(header),
            _ => None,
        })
    }

    #[must_use]
    pub fn wlan_mgt_tags(&self) -> Option<&[ManagementTag]> {
        self.layers.iter().find_map(|l| match l {
            Layer::WlanMgt { tags } => Some(tags.as_slice()),
            _ => None,
        })
    }

    /// The first `ip`/`ipv6` layer's `(src, dst)`, if present.
    #[must_use]
    pub fn ip(&self) -> Option<(IpAddr, IpAddr)> {
        self.layers.iter().find_map(|l| match l {
            Layer::Ip { src, dst } | Layer::Ipv6 { src, dst } => Some((*src, *dst)),
            _ => None,
        })
    }

    /// The first `tcp`/`udp` layer's `(src_port, dst_port)`, if present.
    #[must_use]
    pub fn ports(&self) -> Option<(u16, u16)> {
        self.layers.iter().find_map(|l| match l {
            Layer::Tcp { src_port, dst_port } | Layer::Udp { src_port, dst_port } => {
                Some((*src_port, *dst_port))
            }
            _ => None,
        })
    }
}
