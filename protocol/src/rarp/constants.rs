//! RARP frame constants.

/// The RARP ethertype.
pub const ETHERTYPE_RARP: u16 = 0x8035;

/// The IPv4 ethertype, used as the RARP protocol type.
pub const ETHERTYPE_IPV4: u16 = 0x0800;

/// The Ethernet hardware type.
pub const HARDWARE_TYPE_ETHERNET: u16 = 1;

/// Destination, source and ethertype.
pub const SIZE_ETHERNET_HEADER: usize = 14;

/// The fixed Ethernet/IPv4 RARP payload.
pub const SIZE_RARP_PAYLOAD: usize = 28;

/// The smallest frame the decoder accepts and the size of every encoded reply.
pub const SIZE_FRAME: usize = SIZE_ETHERNET_HEADER + SIZE_RARP_PAYLOAD;

/// MAC-48 length.
pub const SIZE_HARDWARE_ADDRESS: u8 = 6;

/// IPv4 length.
pub const SIZE_PROTOCOL_ADDRESS: u8 = 4;
