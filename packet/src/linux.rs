//! The Linux implementation using an `AF_PACKET` socket.

use std::{
    io,
    mem,
    net::{Ipv4Addr, SocketAddrV4},
    os::unix::io::{AsRawFd, FromRawFd, OwnedFd},
};

use eui48::{EUI48LEN, MacAddress};
use log::trace;
use nix::{
    ifaddrs,
    net::if_::{self, InterfaceFlags},
};

use super::{link_protocol, Error, Interface, Result};

pub(crate) fn interface(name: &str) -> Result<Interface> {
    let index = if_::if_nametoindex(name).map_err(|_| Error::InterfaceNotFound(name.to_owned()))?;

    let mut is_up = false;
    let mut hardware_address = None;
    let mut ipv4_address = None;

    let entries = ifaddrs::getifaddrs().map_err(io::Error::from)?;
    for entry in entries.filter(|entry| entry.interface_name == name) {
        is_up |= entry.flags.contains(InterfaceFlags::IFF_UP);

        let address = match entry.address {
            Some(address) => address,
            None => continue,
        };
        if let Some(link) = address.as_link_addr() {
            if hardware_address.is_none() {
                hardware_address = link.addr().map(MacAddress::new);
            }
        }
        if let Some(inet) = address.as_sockaddr_in() {
            if ipv4_address.is_none() {
                ipv4_address = Some(*SocketAddrV4::from(*inet).ip());
            }
        }
    }

    if !is_up {
        return Err(Error::InterfaceDown(name.to_owned()));
    }
    let hardware_address = hardware_address
        .filter(|mac| !mac.is_nil())
        .ok_or_else(|| Error::NoHardwareAddress(name.to_owned()))?;
    let ipv4_address: Ipv4Addr = ipv4_address.ok_or_else(|| Error::NoIpv4Address(name.to_owned()))?;

    Ok(Interface {
        name: name.to_owned(),
        index,
        hardware_address,
        ipv4_address,
    })
}

pub(crate) struct Socket {
    fd                      : OwnedFd,
    index                   : libc::c_int,
    protocol                : u16,
}

impl Socket {
    pub(crate) fn bind(interface: &Interface, ether_type: u16) -> Result<Self> {
        let protocol = link_protocol(ether_type);

        let fd = unsafe { libc::socket(libc::AF_PACKET, libc::SOCK_RAW, libc::c_int::from(protocol)) };
        if fd < 0 {
            return Err(io::Error::last_os_error().into());
        }
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };

        let index = interface.index as libc::c_int;
        let mut address: libc::sockaddr_ll = unsafe { mem::zeroed() };
        address.sll_family = libc::AF_PACKET as libc::c_ushort;
        address.sll_protocol = protocol;
        address.sll_ifindex = index;

        let result = unsafe {
            libc::bind(
                fd.as_raw_fd(),
                &address as *const libc::sockaddr_ll as *const libc::sockaddr,
                mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t,
            )
        };
        if result < 0 {
            return Err(io::Error::last_os_error().into());
        }

        trace!("Bound a raw socket to {} for ethertype 0x{:04x}", interface.name, ether_type);
        Ok(Socket { fd, index, protocol })
    }

    pub(crate) fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let received = unsafe {
                libc::recv(self.fd.as_raw_fd(), buf.as_mut_ptr() as *mut libc::c_void, buf.len(), 0)
            };
            if received >= 0 {
                return Ok(received as usize);
            }
            let error = io::Error::last_os_error();
            if error.kind() != io::ErrorKind::Interrupted {
                return Err(error);
            }
        }
    }

    pub(crate) fn send_to(&self, frame: &[u8], destination: MacAddress) -> io::Result<usize> {
        let mut address: libc::sockaddr_ll = unsafe { mem::zeroed() };
        address.sll_family = libc::AF_PACKET as libc::c_ushort;
        address.sll_protocol = self.protocol;
        address.sll_ifindex = self.index;
        address.sll_halen = EUI48LEN as u8;
        address.sll_addr[..EUI48LEN].copy_from_slice(destination.as_bytes());

        let sent = unsafe {
            libc::sendto(
                self.fd.as_raw_fd(),
                frame.as_ptr() as *const libc::c_void,
                frame.len(),
                0,
                &address as *const libc::sockaddr_ll as *const libc::sockaddr,
                mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t,
            )
        };
        if sent < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(sent as usize)
    }
}
