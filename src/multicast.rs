//! Pure multicast-classification predicates (spec.md §4.7/§6). Out of scope
//! as a *design* concern (the spec treats these as an external collaborator)
//! but trivial and total, so implemented directly rather than behind a
//! trait.

use std::net::IpAddr;

use crate::model::MacAddr;

/// True if `addr` is a multicast network-layer address.
#[must_use]
pub fn ip_multicast(addr: &IpAddr) -> bool {
    addr.is_multicast()
}

/// True if `mac` has the I/G (Individual/Group) bit set — the standard
/// Ethernet convention for multicast/broadcast addresses.
#[must_use]
pub fn mac_multicast(mac: &MacAddr) -> bool {
    mac.is_multicast()
}
