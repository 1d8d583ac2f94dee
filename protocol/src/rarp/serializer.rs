//! RARP frame serialization module.

use std::net::Ipv4Addr;

use bytes::BufMut;
use eui48::MacAddress;

use crate::rarp::{
    Operation,
    constants::*,
};

/// Builds a RARP reply frame.
///
/// The frame is sent from `source_mac` to `target_mac`, announcing `source_ip`
/// as the answering server and `target_ip` as the address of `target_mac`.
pub fn encode(
    source_mac                      : MacAddress,
    source_ip                       : Ipv4Addr,
    target_mac                      : MacAddress,
    target_ip                       : Ipv4Addr,
) -> Vec<u8> {
    let mut dst = Vec::with_capacity(SIZE_FRAME);

    dst.put_slice(target_mac.as_bytes());
    dst.put_slice(source_mac.as_bytes());
    dst.put_u16(ETHERTYPE_RARP);

    dst.put_u16(HARDWARE_TYPE_ETHERNET);
    dst.put_u16(ETHERTYPE_IPV4);
    dst.put_u8(SIZE_HARDWARE_ADDRESS);
    dst.put_u8(SIZE_PROTOCOL_ADDRESS);
    dst.put_u16(Operation::RarpReply.into());
    dst.put_slice(source_mac.as_bytes());
    dst.put_slice(&source_ip.octets());
    dst.put_slice(target_mac.as_bytes());
    dst.put_slice(&target_ip.octets());

    dst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rarp::decode;

    fn server_mac() -> MacAddress {
        MacAddress::new([0x00, 0x11, 0x22, 0x33, 0x44, 0x55])
    }

    fn client_mac() -> MacAddress {
        MacAddress::new([0xde, 0xad, 0xbe, 0xef, 0x00, 0x01])
    }

    #[test]
    fn encodes_exact_bytes() {
        let frame = encode(
            server_mac(),
            Ipv4Addr::new(192, 168, 1, 1),
            client_mac(),
            Ipv4Addr::new(192, 168, 1, 100),
        );

        let expected: [u8; SIZE_FRAME] = [
            0xde, 0xad, 0xbe, 0xef, 0x00, 0x01,
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55,
            0x80, 0x35,
            0x00, 0x01,
            0x08, 0x00,
            0x06,
            0x04,
            0x00, 0x04,
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55,
            192, 168, 1, 1,
            0xde, 0xad, 0xbe, 0xef, 0x00, 0x01,
            192, 168, 1, 100,
        ];
        assert_eq!(frame, expected.to_vec());
    }

    #[test]
    fn decoded_reply_carries_the_inputs() {
        let frame = encode(
            server_mac(),
            Ipv4Addr::new(10, 0, 0, 1),
            client_mac(),
            Ipv4Addr::new(10, 0, 0, 2),
        );

        let (ethernet, packet) = decode(&frame).unwrap();
        assert_eq!(ethernet.destination, client_mac());
        assert_eq!(ethernet.source, server_mac());
        assert_eq!(packet.operation, Operation::RarpReply);
        assert_eq!(packet.sender_hardware_address, server_mac());
        assert_eq!(packet.sender_protocol_address, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(packet.target_hardware_address, client_mac());
        assert_eq!(packet.target_protocol_address, Ipv4Addr::new(10, 0, 0, 2));
    }
}
