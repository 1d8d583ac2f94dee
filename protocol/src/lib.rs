//! Wire formats of the diskless boot sequence.
//!
//! * `rarp` - Ethernet-encapsulated RARP frames (RFC 903).
//! * `rpc` - the subset of ONC RPC v2 and XDR used by bootparam.
//! * `bootparam` - the bootparam program (100026, version 1) arguments and results.
//! * `tftp` - RFC 1350 packets for the default-image TFTP server.

pub mod error;
pub mod rarp;
pub mod rpc;
pub mod bootparam;
pub mod tftp;

pub use self::error::{Error, Result};
