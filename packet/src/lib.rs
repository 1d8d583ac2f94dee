//! The OS-polymorphic link-layer interface.
//!
//! Only Linux is implemented, with an `AF_PACKET` socket.

#[cfg(target_os = "linux")]
#[path = "linux.rs"]
mod os;
#[cfg(not(target_os = "linux"))]
#[path = "other.rs"]
mod os;

use std::{fmt, io, net::Ipv4Addr};

use eui48::MacAddress;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Interface {0} not found")]
    InterfaceNotFound(String),
    #[error("Interface {0} is down")]
    InterfaceDown(String),
    #[error("Interface {0} has no Ethernet hardware address")]
    NoHardwareAddress(String),
    #[error("Interface {0} has no IPv4 address")]
    NoIpv4Address(String),
    #[error("Socket error: {0}")]
    Io(#[from] io::Error),
    #[error("Raw sockets are not supported on this platform")]
    Unsupported,
}

pub type Result<T> = std::result::Result<T, Error>;

/// A network interface suitable for serving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    pub name                    : String,
    pub index                   : u32,
    pub hardware_address        : MacAddress,
    /// The first IPv4 address found on the interface.
    pub ipv4_address            : Ipv4Addr,
}

impl Interface {
    /// Looks the interface up and checks that it is up and has both addresses.
    pub fn by_name(name: &str) -> Result<Self> {
        os::interface(name)
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} (index {}, {}, {})",
            self.name,
            self.index,
            self.hardware_address.to_hex_string(),
            self.ipv4_address,
        )
    }
}

/// The `sll_protocol` value selecting `ether_type`: the ethertype in network order.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub(crate) fn link_protocol(ether_type: u16) -> u16 {
    ether_type.to_be()
}

/// A blocking raw socket receiving and sending whole Ethernet frames of one ethertype.
pub struct RawSocket(os::Socket);

impl RawSocket {
    pub fn bind(interface: &Interface, ether_type: u16) -> Result<Self> {
        Ok(RawSocket(os::Socket::bind(interface, ether_type)?))
    }

    /// Blocks until a frame arrives and returns its length.
    pub fn recv(&self, buf: &mut [u8]) -> Result<usize> {
        Ok(self.0.recv(buf)?)
    }

    /// Sends a complete frame to the link-layer `destination`.
    pub fn send_to(&self, frame: &[u8], destination: MacAddress) -> Result<usize> {
        Ok(self.0.send_to(frame, destination)?)
    }
}
