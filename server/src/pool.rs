//! The dynamic address pool.

use std::{fmt, net::Ipv4Addr, str::FromStr};

use ipnetwork::Ipv4Network;

use crate::error::{Error, Result};

/// The host addresses of a CIDR block, without its network and broadcast addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressPool {
    network                 : Ipv4Network,
    first_usable            : Ipv4Addr,
    last_usable             : Ipv4Addr,
}

impl AddressPool {
    pub fn new(network: Ipv4Network) -> Result<Self> {
        let first = u32::from(network.network()).checked_add(1);
        let last = u32::from(network.broadcast()).checked_sub(1);

        match (first, last) {
            (Some(first), Some(last)) if first <= last => Ok(AddressPool {
                network,
                first_usable: Ipv4Addr::from(first),
                last_usable: Ipv4Addr::from(last),
            }),
            _ => Err(Error::EmptyPool(network.to_string())),
        }
    }

    pub fn network(&self) -> Ipv4Addr {
        self.network.network()
    }

    pub fn mask(&self) -> Ipv4Addr {
        self.network.mask()
    }

    pub fn first_usable(&self) -> Ipv4Addr {
        self.first_usable
    }

    pub fn last_usable(&self) -> Ipv4Addr {
        self.last_usable
    }

    pub fn contains(&self, address: Ipv4Addr) -> bool {
        self.first_usable <= address && address <= self.last_usable
    }

    /// The usable addresses in ascending order.
    pub fn addresses(&self) -> impl Iterator<Item = Ipv4Addr> {
        (u32::from(self.first_usable)..=u32::from(self.last_usable)).map(Ipv4Addr::from)
    }
}

impl FromStr for AddressPool {
    type Err = Error;

    fn from_str(cidr: &str) -> Result<Self> {
        let cidr = cidr.trim();
        let network = Ipv4Network::from_str(cidr).map_err(|source| Error::InvalidCidr {
            cidr: cidr.to_owned(),
            source,
        })?;
        Self::new(network)
    }
}

impl fmt::Display for AddressPool {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({} - {})", self.network, self.first_usable, self.last_usable)
    }
}
