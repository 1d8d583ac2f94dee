//! The bootparam program (100026, version 1).
//!
//! Only `WHOAMI` and `GETFILE` are implemented. Both carry addresses as four
//! raw bytes rather than the `bp_address` union of the protocol
//! definition, which is what the clients this server targets send and expect.

use std::net::Ipv4Addr;

use crate::rpc::{Reader, Writer};

/// The bootparam RPC program number.
pub const PROGRAM: u32 = 100026;

/// The bootparam RPC program version.
pub const VERSION: u32 = 1;

/// The file identifier used when the client sends none.
pub const FILE_ID_ROOT: &str = "root";

/// The swap file identifier.
pub const FILE_ID_SWAP: &str = "swap";

/// The bootparam procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Procedure {
    Whoami,
    Getfile,
    Undefined(u32),
}

impl From<u32> for Procedure {
    fn from(value: u32) -> Self {
        use self::Procedure::*;
        match value {
            1 => Whoami,
            2 => Getfile,
            value => Undefined(value),
        }
    }
}

/// `WHOAMI` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhoamiArgs {
    /// The address the client claims, if it sent one.
    pub client_address              : Option<Ipv4Addr>,
}

impl WhoamiArgs {
    /// Never fails: a client sending less than four bytes is identified by its source address.
    pub fn read(reader: &mut Reader) -> Self {
        let client_address = if reader.remaining() >= 4 {
            reader.get_ipv4().ok()
        } else {
            None
        };
        WhoamiArgs { client_address }
    }
}

/// `WHOAMI` results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhoamiReply {
    /// The client address in dotted-quad notation.
    pub client_name                 : String,
    pub domain_name                 : String,
    pub router_address              : Ipv4Addr,
}

impl WhoamiReply {
    pub fn write(&self, writer: &mut Writer) {
        writer.put_string(&self.client_name);
        writer.put_string(&self.domain_name);
        writer.put_ipv4(self.router_address);
    }
}

/// `GETFILE` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetfileArgs {
    pub client_name                 : String,
    /// Lowercased.
    pub file_id                     : String,
}

impl GetfileArgs {
    /// Best effort: an undecodable client name is empty
    /// and an undecodable file identifier is `FILE_ID_ROOT`.
    pub fn read(reader: &mut Reader) -> Self {
        let client_name = reader.get_string().unwrap_or_default();
        let file_id = reader
            .get_string()
            .unwrap_or_else(|_| FILE_ID_ROOT.to_owned())
            .to_lowercase();
        GetfileArgs { client_name, file_id }
    }
}

/// `GETFILE` results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetfileReply {
    pub server_name                 : String,
    pub server_address              : Ipv4Addr,
    pub path                        : String,
}

impl GetfileReply {
    pub fn write(&self, writer: &mut Writer) {
        writer.put_string(&self.server_name);
        writer.put_ipv4(self.server_address);
        writer.put_string(&self.path);
    }
}
