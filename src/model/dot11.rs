//! Minimal IEEE 802.11 MAC header and management-frame tag reader.
//!
//! This is deliberately narrow: just enough of the frame control field and
//! the tagged parameter set to support §4.1/§4.3 of the spec (frame type
//! classification and SSID extraction). A real capture/decoder stack is an
//! external collaborator (spec.md §1) — this module stands in for it.

use crate::model::mac::MacAddr;

/// 802.11 frame-control subtype, as observed on the wire (`fc_type_subtype`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    Beacon,
    Probe,
    ProbeResponse,
}

impl FrameType {
    /// Classify from the raw 16-bit frame-control field.
    ///
    /// Subtype `0x0004` is a probe request, `0x0005` a probe response;
    /// anything else observed on a management frame is treated as a beacon,
    /// matching the source's `else -> beacon` fallback (spec.md §3).
    #[must_use]
    pub fn from_fc_type_subtype(fc_type_subtype: u16) -> Self {
        match fc_type_subtype {
            0x0004 => FrameType::Probe,
            0x0005 => FrameType::ProbeResponse,
            _ => FrameType::Beacon,
        }
    }
}

/// The subset of an 802.11 MAC header the projection engine cares about.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dot11Header {
    pub sa: Option<MacAddr>,
    pub da: Option<MacAddr>,
    pub ta: Option<MacAddr>,
    pub ra: Option<MacAddr>,
    pub fc_type_subtype: u16,
}

impl Dot11Header {
    /// Apply the `ta == sa` / `ra == da` suppression rule from spec.md §4.1.
    #[must_use]
    pub fn with_duplicate_addresses_suppressed(mut self) -> Self {
        if self.ta == self.sa {
            self.ta = None;
        }
        if self.ra == self.da {
            self.ra = None;
        }
        self
    }
}

/// A single tagged parameter from a management frame's fixed+tagged body
/// (IEEE 802.11, 9.4.2: tag number, tag length, tag data).
#[derive(Debug, Clone)]
pub struct ManagementTag {
    pub number: u8,
    pub data: Vec<u8>,
}

pub const TAG_SSID: u8 = 0;

/// Read a run of `tag | length | data` triples out of a management frame
/// body. Truncated trailing tags are ignored rather than erroring, per the
/// "never fails on missing layers" contract of spec.md §4.1.
#[must_use]
pub fn parse_management_tags(body: &[u8]) -> Vec<ManagementTag> {
    let mut tags = Vec::new();
    let mut offset = 0;
    while offset + 2 <= body.len() {
        let number = body[offset];
        let length = body[offset + 1] as usize;
        let start = offset + 2;
        let end = start + length;
        if end > body.len() {
            break;
        }
        tags.push(ManagementTag {
            number,
            data: body[start..end].to_vec(),
        });
        offset = end;
    }
    tags
}

/// Extract the SSID from a management frame's tagged parameters, applying
/// the byte-window semantics of spec.md §4.1/§9: the source reads
/// `tag[len(tag)-length-1..-1]`, i.e. the tag bytes minus a trailing
/// delimiter. Since we parse the tag data directly (already delimiter-free),
/// this reduces to "the tag bytes themselves, lossily decoded as UTF-8",
/// with a zero-length tag treated as no SSID present.
#[must_use]
pub fn extract_ssid(tags: &[ManagementTag]) -> Option<String> {
    let tag = tags.iter().find(|t| t.number == TAG_SSID)?;
    if tag.data.is_empty() {
        return None;
    }
    let ssid = String::from_utf8_lossy(&tag.data).into_owned();
    if ssid.is_empty() || ssid == "SSID" {
        // Empty/"wildcard" SSID: spec.md §9 resolves the open question by
        // treating both as "no SSID", since the literal sentinel only ever
        // arose from empty extraction in the source.
        None
    } else {
        Some(ssid)
    }
}
