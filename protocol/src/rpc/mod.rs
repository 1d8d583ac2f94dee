//! The ONC RPC v2 subset (RFC 5531) used by bootparam.
//!
//! Only calls are decoded and only accepted replies are encoded.
//! Credentials and verifiers are skipped, `AUTH_NULL` is always answered.

mod reader;
mod writer;

use std::fmt;

use crate::error::{Error, Result};

pub use self::{
    reader::Reader,
    writer::{Writer, accepted_reply},
};

/// The only supported RPC protocol version.
pub const RPC_VERSION: u32 = 2;

/// `reply_stat`
pub const MSG_ACCEPTED: u32 = 0;

/// `auth_flavor`
pub const AUTH_NULL: u32 = 0;

/// `accept_stat`
pub const ACCEPT_SUCCESS: u32 = 0;

/// XDR data is aligned to 4 bytes.
pub const XDR_ALIGNMENT: usize = 4;

/// The number of zero bytes following `length` bytes of XDR opaque data.
pub fn padding(length: usize) -> usize {
    (XDR_ALIGNMENT - length % XDR_ALIGNMENT) % XDR_ALIGNMENT
}

/// `msg_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Call,
    Reply,
    Undefined(u32),
}

impl From<u32> for MessageType {
    fn from(value: u32) -> Self {
        use self::MessageType::*;
        match value {
            0 => Call,
            1 => Reply,
            value => Undefined(value),
        }
    }
}

impl From<MessageType> for u32 {
    fn from(value: MessageType) -> Self {
        use self::MessageType::*;
        match value {
            Call => 0,
            Reply => 1,
            Undefined(value) => value,
        }
    }
}

/// The fixed part of an RPC call preceding the credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallHeader {
    pub transaction_id              : u32,
    pub message_type                : MessageType,
    pub rpc_version                 : u32,
    pub program                     : u32,
    pub version                     : u32,
    pub procedure                   : u32,
}

impl CallHeader {
    /// Reads the header, leaving the reader at the credentials.
    ///
    /// # Errors
    /// `Error::UnexpectedEof` if the header is cut short.
    /// `Error::NotCall` if the message is not a call.
    /// `Error::RpcVersion` if the RPC version is not `RPC_VERSION`.
    pub fn read(reader: &mut Reader) -> Result<Self> {
        let transaction_id = reader.get_u32()?;
        let message_type = MessageType::from(reader.get_u32()?);
        if message_type != MessageType::Call {
            return Err(Error::NotCall(message_type.into()));
        }
        let rpc_version = reader.get_u32()?;
        if rpc_version != RPC_VERSION {
            return Err(Error::RpcVersion(rpc_version));
        }

        Ok(CallHeader {
            transaction_id,
            message_type,
            rpc_version,
            program: reader.get_u32()?,
            version: reader.get_u32()?,
            procedure: reader.get_u32()?,
        })
    }
}

impl fmt::Display for CallHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "xid={} prog={} vers={} proc={}",
            self.transaction_id, self.program, self.version, self.procedure,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(words: &[u32]) -> Vec<u8> {
        let mut writer = Writer::new();
        for word in words {
            writer.put_u32(*word);
        }
        writer.into_vec()
    }

    #[test]
    fn pads_to_four_bytes() {
        assert_eq!(padding(0), 0);
        assert_eq!(padding(1), 3);
        assert_eq!(padding(2), 2);
        assert_eq!(padding(3), 1);
        assert_eq!(padding(4), 0);
        assert_eq!(padding(13), 3);
    }

    #[test]
    fn reads_call_header() {
        let src = call(&[0xdead_beef, 0, 2, 100026, 1, 2, AUTH_NULL, 0]);
        let mut reader = Reader::new(&src);

        let header = CallHeader::read(&mut reader).unwrap();
        assert_eq!(header, CallHeader {
            transaction_id: 0xdead_beef,
            message_type: MessageType::Call,
            rpc_version: 2,
            program: 100026,
            version: 1,
            procedure: 2,
        });
        assert_eq!(reader.remaining(), 8);
    }

    #[test]
    fn rejects_reply() {
        let src = call(&[1, 1, 2, 100026, 1, 1]);
        assert_eq!(CallHeader::read(&mut Reader::new(&src)).unwrap_err(), Error::NotCall(1));
    }

    #[test]
    fn rejects_other_rpc_version() {
        let src = call(&[1, 0, 3, 100026, 1, 1]);
        assert_eq!(CallHeader::read(&mut Reader::new(&src)).unwrap_err(), Error::RpcVersion(3));
    }

    #[test]
    fn rejects_truncated_header() {
        let src = call(&[1, 0, 2, 100026]);
        assert_eq!(CallHeader::read(&mut Reader::new(&src)).unwrap_err(), Error::UnexpectedEof);
    }
}
