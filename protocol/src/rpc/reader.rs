//! XDR deserialization module.

use std::net::Ipv4Addr;

use bytes::Buf;

use crate::{
    error::{Error, Result},
    rpc::padding,
};

/// Checks if there is enough data left to get a value.
macro_rules! check_remaining(
    ($cursor:expr, $length:expr) => (
        if $cursor.remaining() < $length {
            return Err(Error::UnexpectedEof);
        }
    )
);

/// A cursor over an XDR-encoded datagram.
///
/// A failed read consumes nothing but the length word of the failed field.
pub struct Reader<'a> {
    cursor: &'a [u8],
}

impl<'a> Reader<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        Reader { cursor: src }
    }

    /// The number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    /// A big-endian `unsigned int`.
    pub fn get_u32(&mut self) -> Result<u32> {
        check_remaining!(self.cursor, 4);
        Ok(self.cursor.get_u32())
    }

    /// Four raw bytes in network order.
    pub fn get_ipv4(&mut self) -> Result<Ipv4Addr> {
        self.get_u32().map(Ipv4Addr::from)
    }

    /// Variable-length `opaque<>` data without its padding.
    ///
    /// Missing padding at the very end of the datagram is tolerated.
    ///
    /// # Errors
    /// `Error::ShortOpaque` if the declared length exceeds the remaining data.
    pub fn get_opaque(&mut self) -> Result<&'a [u8]> {
        let declared = self.get_u32()? as usize;
        let remaining = self.cursor.remaining();
        if declared > remaining {
            return Err(Error::ShortOpaque { declared, remaining });
        }

        let cursor: &'a [u8] = self.cursor;
        let (value, rest) = cursor.split_at(declared);
        let skip = padding(declared).min(rest.len());
        self.cursor = &rest[skip..];
        Ok(value)
    }

    /// An XDR `string<>`, invalid UTF-8 is replaced.
    pub fn get_string(&mut self) -> Result<String> {
        self.get_opaque()
            .map(|value| String::from_utf8_lossy(value).into_owned())
    }

    /// Skips an `opaque_auth` (flavor and body).
    pub fn skip_auth(&mut self) -> Result<()> {
        let _flavor = self.get_u32()?;
        self.get_opaque().map(|_| ())
    }
}
