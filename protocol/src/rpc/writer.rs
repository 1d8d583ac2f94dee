//! XDR serialization module.

use std::net::Ipv4Addr;

use bytes::{BufMut, BytesMut};

use crate::rpc::{
    padding,
    MessageType,
    MSG_ACCEPTED,
    AUTH_NULL,
    ACCEPT_SUCCESS,
};

/// Must be enough for any bootparam reply.
const DEFAULT_CAPACITY: usize = 512;

/// An XDR encoder.
pub struct Writer {
    buf: BytesMut,
}

impl Writer {
    pub fn new() -> Self {
        Writer {
            buf: BytesMut::with_capacity(DEFAULT_CAPACITY),
        }
    }

    pub fn put_u32(&mut self, value: u32) {
        self.buf.put_u32(value);
    }

    /// Four raw bytes, not an XDR structure.
    pub fn put_ipv4(&mut self, value: Ipv4Addr) {
        self.buf.put_slice(&value.octets());
    }

    pub fn put_opaque(&mut self, value: &[u8]) {
        self.buf.put_u32(value.len() as u32);
        self.buf.put_slice(value);
        self.buf.put_bytes(0, padding(value.len()));
    }

    pub fn put_string(&mut self, value: &str) {
        self.put_opaque(value.as_bytes());
    }

    pub fn put_slice(&mut self, value: &[u8]) {
        self.buf.put_slice(value);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf.to_vec()
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a successful reply to the call `transaction_id` with an `AUTH_NULL` verifier.
///
/// `body` is appended as is, so it must already be XDR-encoded.
pub fn accepted_reply(transaction_id: u32, body: &[u8]) -> Vec<u8> {
    let mut writer = Writer::new();
    writer.put_u32(transaction_id);
    writer.put_u32(MessageType::Reply.into());
    writer.put_u32(MSG_ACCEPTED);
    writer.put_u32(AUTH_NULL);
    writer.put_opaque(&[]);
    writer.put_u32(ACCEPT_SUCCESS);
    writer.put_slice(body);
    writer.into_vec()
}
