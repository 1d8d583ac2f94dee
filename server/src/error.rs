//! Error module

use std::io;

use thiserror::Error;

/// Configuration errors are fatal at startup; `Io` ends only the loop it came from.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid CIDR `{cidr}`: {source}")]
    InvalidCidr {
        cidr: String,
        source: ipnetwork::IpNetworkError,
    },
    #[error("CIDR `{0}` has no usable host addresses")]
    EmptyPool(String),
    #[error("Mapping entry `{0}` has no `=` separator")]
    MissingSeparator(String),
    #[error("Invalid MAC address `{0}`")]
    InvalidMac(String),
    #[error("Invalid IPv4 address `{0}`")]
    InvalidIpv4(String),
    #[error("Link error: {0}")]
    Link(#[from] netboot_packet::Error),
    #[error("Socket error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
