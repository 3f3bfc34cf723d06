//! OUI (manufacturer prefix) lookup collaborator (spec.md §4.6/§6).
//!
//! The real IEEE OUI database is explicitly out of scope (spec.md §1); this
//! module defines the trait boundary the extractor calls through, plus a
//! null implementation for tests and a tiny static table covering a
//! handful of well-known prefixes so the crate is useful standalone.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::model::MacAddr;

/// `query(mac) -> manufacturer?`. Implementations must swallow their own
/// errors: an unresolved MAC yields `None`, never a panic or `Err` (spec.md
/// §6).
pub trait OuiLookup: Send + Sync {
    fn query(&self, mac: &MacAddr) -> Option<String>;
}

/// Always returns `None`. Used as the default when no real OUI source is
/// configured, and throughout the test suite.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullOuiLookup;

impl OuiLookup for NullOuiLookup {
    fn query(&self, _mac: &MacAddr) -> Option<String> {
        None
    }
}

static WELL_KNOWN_PREFIXES: LazyLock<HashMap<[u8; 3], &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ([0x00, 0x1A, 0x11], "Google, Inc."),
        ([0xF4, 0xF5, 0xD8], "Google, Inc."),
        ([0x3C, 0x22, 0xFB], "Apple, Inc."),
        ([0xAC, 0xDE, 0x48], "Apple, Inc."),
        ([0x00, 0x50, 0x56], "VMware, Inc."),
        ([0x08, 0x00, 0x27], "PCS Systemtechnik GmbH (VirtualBox)"),
        ([0xB8, 0x27, 0xEB], "Raspberry Pi Foundation"),
        ([0xDC, 0xA6, 0x32], "Raspberry Pi Trading Ltd"),
    ])
});

/// A small in-memory stand-in for a real OUI database, keyed by the 3-byte
/// manufacturer prefix.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticOuiLookup;

impl OuiLookup for StaticOuiLookup {
    fn query(&self, mac: &MacAddr) -> Option<String> {
        WELL_KNOWN_PREFIXES
            .get(&mac.oui_prefix())
            .map(|s| (*s).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_lookup_always_absent() {
        let mac: MacAddr = "aa:bb:cc:dd:ee:ff".parse().unwrap();
        assert_eq!(NullOuiLookup.query(&mac), None);
    }

    #[test]
    fn static_lookup_resolves_known_prefix() {
        let mac: MacAddr = "b8:27:eb:11:22:33".parse().unwrap();
        assert_eq!(
            StaticOuiLookup.query(&mac).as_deref(),
            Some("Raspberry Pi Foundation")
        );
    }

    #[test]
    fn static_lookup_unresolved_is_none_not_error() {
        let mac: MacAddr = "11:22:33:44:55:66".parse().unwrap();
        assert_eq!(StaticOuiLookup.query(&mac), None);
    }
}
