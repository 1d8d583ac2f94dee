use std::io;

use eui48::MacAddress;

use super::{Error, Interface, Result};

pub(crate) fn interface(_name: &str) -> Result<Interface> {
    Err(Error::Unsupported)
}

pub(crate) struct Socket;

impl Socket {
    pub(crate) fn bind(_interface: &Interface, _ether_type: u16) -> Result<Self> {
        Err(Error::Unsupported)
    }

    pub(crate) fn recv(&self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "unsupported"))
    }

    pub(crate) fn send_to(&self, _frame: &[u8], _destination: MacAddress) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "unsupported"))
    }
}
