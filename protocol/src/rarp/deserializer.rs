//! RARP frame deserialization module.

use std::net::Ipv4Addr;

use bytes::Buf;
use eui48::{
    MacAddress,
    EUI48LEN,
};

use crate::{
    error::{Error, Result},
    rarp::{
        EthernetFrame,
        RarpPacket,
        constants::*,
    },
};

/// Splits a raw Ethernet frame into its header and RARP payload.
///
/// Every field is big-endian. Trailing bytes (Ethernet padding) are ignored.
///
/// # Errors
/// `Error::TruncatedFrame` if there are less than `SIZE_FRAME` bytes.
/// `Error::WrongEtherType` if the ethertype is not `ETHERTYPE_RARP`.
pub fn decode(src: &[u8]) -> Result<(EthernetFrame, RarpPacket)> {
    if src.len() < SIZE_FRAME {
        return Err(Error::TruncatedFrame { length: src.len() });
    }

    let mut cursor = src;
    let destination = get_mac(&mut cursor);
    let source = get_mac(&mut cursor);
    let ether_type = cursor.get_u16();
    if ether_type != ETHERTYPE_RARP {
        return Err(Error::WrongEtherType(ether_type));
    }

    let frame = EthernetFrame {
        destination,
        source,
        ether_type,
        payload: cursor.to_vec(),
    };

    let packet = RarpPacket {
        hardware_type: cursor.get_u16(),
        protocol_type: cursor.get_u16(),
        hardware_address_length: cursor.get_u8(),
        protocol_address_length: cursor.get_u8(),
        operation: cursor.get_u16().into(),
        sender_hardware_address: get_mac(&mut cursor),
        sender_protocol_address: Ipv4Addr::from(cursor.get_u32()),
        target_hardware_address: get_mac(&mut cursor),
        target_protocol_address: Ipv4Addr::from(cursor.get_u32()),
    };

    Ok((frame, packet))
}

/// The length must be checked by the caller.
fn get_mac(cursor: &mut &[u8]) -> MacAddress {
    let mut octets = [0u8; EUI48LEN];
    cursor.copy_to_slice(&mut octets);
    MacAddress::new(octets)
}
