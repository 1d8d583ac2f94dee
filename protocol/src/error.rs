//! Error module

use thiserror::Error;

/// Returned by every decoder of this crate.
///
/// All of them are recoverable: the caller drops the frame or datagram.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Frame is too short: {length} bytes")]
    TruncatedFrame { length: usize },
    #[error("Not a RARP ethertype: 0x{0:04x}")]
    WrongEtherType(u16),
    #[error("Unexpected end of data")]
    UnexpectedEof,
    #[error("Opaque field of {declared} bytes exceeds the remaining {remaining} bytes")]
    ShortOpaque { declared: usize, remaining: usize },
    #[error("Not an RPC call: message type {0}")]
    NotCall(u32),
    #[error("Unsupported RPC version {0}")]
    RpcVersion(u32),
    #[error("Invalid TFTP packet: {0}")]
    InvalidTftp(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
