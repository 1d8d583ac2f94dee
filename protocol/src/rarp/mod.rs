//! The RARP frame module.

pub mod constants;
pub mod operation;

mod deserializer;
mod serializer;

use std::{
    fmt,
    net::Ipv4Addr,
};

use eui48::MacAddress;

pub use self::{
    constants::*,
    operation::Operation,
    deserializer::decode,
    serializer::encode,
};

/// The Ethernet II header of a received frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthernetFrame {
    pub destination                 : MacAddress,
    pub source                      : MacAddress,
    pub ether_type                  : u16,
    /// The bytes following the header, the RARP payload included.
    pub payload                     : Vec<u8>,
}

/// The RARP payload of an Ethernet frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RarpPacket {
    pub hardware_type               : u16,
    pub protocol_type               : u16,
    pub hardware_address_length     : u8,
    pub protocol_address_length     : u8,
    pub operation                   : Operation,
    pub sender_hardware_address     : MacAddress,
    pub sender_protocol_address     : Ipv4Addr,
    pub target_hardware_address     : MacAddress,
    pub target_protocol_address     : Ipv4Addr,
}

impl fmt::Display for RarpPacket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "______________________________RARP_________________________________________")?;
        writeln!(f, "hardware_type                    | {}", self.hardware_type)?;
        writeln!(f, "protocol_type                    | 0x{:04x}", self.protocol_type)?;
        writeln!(f, "hardware_address_length          | {}", self.hardware_address_length)?;
        writeln!(f, "protocol_address_length          | {}", self.protocol_address_length)?;
        writeln!(f, "operation                        | {:?}", self.operation)?;
        writeln!(f, "sender_hardware_address          | {}", self.sender_hardware_address.to_hex_string())?;
        writeln!(f, "sender_protocol_address          | {}", self.sender_protocol_address)?;
        writeln!(f, "target_hardware_address          | {}", self.target_hardware_address.to_hex_string())?;
        writeln!(f, "target_protocol_address          | {}", self.target_protocol_address)?;
        writeln!(f, "___________________________________________________________________________")?;
        Ok(())
    }
}
