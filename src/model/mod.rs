//! Core data types: link-layer addresses, the decoded-frame tagged union,
//! 802.11 management-frame parsing, and the normalized packet record.

pub mod dot11;
pub mod frame;
pub mod mac;
pub mod packet_record;

pub use dot11::FrameType;
pub use frame::{Frame, Layer};
pub use mac::MacAddr;
pub use packet_record::{IpEndpoints, MacEndpoints, OuiByRole, PacketRecord, Ports};
