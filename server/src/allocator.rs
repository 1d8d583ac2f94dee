//! The IPv4 lease allocator.
//!
//! Leases live as long as the process. Nothing is ever released, so a client
//! retrying its request always gets the address it was given the first time.
//!
//! The allocator is not synchronized: it is owned by the RARP loop, and every
//! `reserve` call must happen before that loop starts.

use std::{
    collections::{HashMap, HashSet},
    net::Ipv4Addr,
};

use eui48::MacAddress;

use crate::pool::AddressPool;

pub struct Allocator {
    pool                    : AddressPool,
    leases                  : HashMap<MacAddress, Ipv4Addr>,
    /// Reserved and leased addresses.
    used                    : HashSet<Ipv4Addr>,
}

impl Allocator {
    pub fn new(pool: AddressPool) -> Self {
        Allocator {
            pool,
            leases: HashMap::new(),
            used: HashSet::new(),
        }
    }

    /// Excludes `address` from dynamic allocation. Idempotent.
    pub fn reserve(&mut self, address: Ipv4Addr) {
        if self.used.insert(address) {
            trace!("Reserved {}", address);
        }
    }

    /// Returns the lease of `mac`, creating one at the lowest free address if there is none.
    ///
    /// `None` means the pool is exhausted.
    pub fn allocate(&mut self, mac: MacAddress) -> Option<Ipv4Addr> {
        if let Some(address) = self.leases.get(&mac) {
            trace!("{} already holds {}", mac.to_hex_string(), address);
            return Some(*address);
        }

        let address = self.first_available_address()?;
        self.leases.insert(mac, address);
        self.used.insert(address);
        debug!("Leased {} to {}", address, mac.to_hex_string());
        Some(address)
    }

    pub fn lease_of(&self, mac: &MacAddress) -> Option<Ipv4Addr> {
        self.leases.get(mac).copied()
    }

    pub fn is_used(&self, address: &Ipv4Addr) -> bool {
        self.used.contains(address)
    }

    pub fn pool(&self) -> &AddressPool {
        &self.pool
    }

    fn first_available_address(&self) -> Option<Ipv4Addr> {
        self.pool.addresses().find(|address| !self.used.contains(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mac(last: u8) -> MacAddress {
        MacAddress::new([0x52, 0x54, 0x00, 0x00, 0x00, last])
    }

    #[test]
    fn exhausts_small_pool() {
        let mut allocator = Allocator::new("10.0.0.0/30".parse().unwrap());
        allocator.reserve(Ipv4Addr::new(10,0,0,1));

        assert_eq!(allocator.allocate(mac(1)), Some(Ipv4Addr::new(10,0,0,2)));
        assert_eq!(allocator.allocate(mac(1)), Some(Ipv4Addr::new(10,0,0,2)));
        assert_eq!(allocator.allocate(mac(2)), None);
        assert_eq!(allocator.lease_of(&mac(2)), None);
    }

    #[test]
    fn allocates_lowest_free_address_in_order() {
        let mut allocator = Allocator::new("192.168.0.0/24".parse().unwrap());
        allocator.reserve(Ipv4Addr::new(192,168,0,2));
        allocator.reserve(Ipv4Addr::new(192,168,0,2));

        assert_eq!(allocator.allocate(mac(1)), Some(Ipv4Addr::new(192,168,0,1)));
        assert_eq!(allocator.allocate(mac(2)), Some(Ipv4Addr::new(192,168,0,3)));
        assert_eq!(allocator.allocate(mac(3)), Some(Ipv4Addr::new(192,168,0,4)));
        assert_eq!(allocator.allocate(mac(1)), Some(Ipv4Addr::new(192,168,0,1)));

        assert!(allocator.is_used(&Ipv4Addr::new(192,168,0,2)));
        assert!(allocator.is_used(&Ipv4Addr::new(192,168,0,4)));
        assert!(!allocator.is_used(&Ipv4Addr::new(192,168,0,5)));
        assert_eq!(allocator.lease_of(&mac(2)), Some(Ipv4Addr::new(192,168,0,3)));
    }

    #[test]
    fn never_leases_one_address_twice() {
        let mut allocator = Allocator::new("172.16.0.0/28".parse().unwrap());

        let leased: HashSet<Ipv4Addr> = (0..14).filter_map(|i| allocator.allocate(mac(i))).collect();
        assert_eq!(leased.len(), 14);
        assert_eq!(allocator.allocate(mac(14)), None);
        assert!(leased.iter().all(|address| allocator.pool().contains(*address)));
    }

    #[test]
    fn ignores_reservations_outside_the_pool() {
        let mut allocator = Allocator::new("10.0.0.0/30".parse().unwrap());
        allocator.reserve(Ipv4Addr::new(192,168,1,1));

        assert_eq!(allocator.allocate(mac(1)), Some(Ipv4Addr::new(10,0,0,1)));
    }
}
