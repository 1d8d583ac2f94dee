//! TFTP packets (RFC 1350).
//!
//! Option extensions (RFC 2347) are parsed past and never acknowledged,
//! so clients fall back to 512-byte blocks.

use std::convert::TryFrom;

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{Error, Result};

/// The data size of every block but the last one.
pub const BLOCK_SIZE: usize = 512;

/// TFTP opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Opcode {
    Rrq = 1,
    Wrq = 2,
    Data = 3,
    Ack = 4,
    Error = 5,
}

impl TryFrom<u16> for Opcode {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            1 => Ok(Opcode::Rrq),
            2 => Ok(Opcode::Wrq),
            3 => Ok(Opcode::Data),
            4 => Ok(Opcode::Ack),
            5 => Ok(Opcode::Error),
            _ => Err(Error::InvalidTftp("unknown opcode")),
        }
    }
}

/// TFTP error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    NotDefined = 0,
    FileNotFound = 1,
    AccessViolation = 2,
    DiskFull = 3,
    IllegalOperation = 4,
    UnknownTransferId = 5,
    FileAlreadyExists = 6,
    NoSuchUser = 7,
}

impl From<u16> for ErrorCode {
    fn from(value: u16) -> Self {
        match value {
            1 => ErrorCode::FileNotFound,
            2 => ErrorCode::AccessViolation,
            3 => ErrorCode::DiskFull,
            4 => ErrorCode::IllegalOperation,
            5 => ErrorCode::UnknownTransferId,
            6 => ErrorCode::FileAlreadyExists,
            7 => ErrorCode::NoSuchUser,
            _ => ErrorCode::NotDefined,
        }
    }
}

/// TFTP packet types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    ReadRequest { filename: String, mode: String },
    WriteRequest { filename: String, mode: String },
    Data { block: u16, data: Vec<u8> },
    Ack { block: u16 },
    Error { code: ErrorCode, message: String },
}

impl Packet {
    pub fn parse(src: &[u8]) -> Result<Self> {
        if src.len() < 2 {
            return Err(Error::InvalidTftp("packet too short"));
        }

        let mut cursor = src;
        match Opcode::try_from(cursor.get_u16())? {
            Opcode::Rrq => {
                let (filename, mode) = Self::parse_request(cursor)?;
                Ok(Packet::ReadRequest { filename, mode })
            },
            Opcode::Wrq => {
                let (filename, mode) = Self::parse_request(cursor)?;
                Ok(Packet::WriteRequest { filename, mode })
            },
            Opcode::Data => {
                if cursor.len() < 2 {
                    return Err(Error::InvalidTftp("data packet too short"));
                }
                let block = cursor.get_u16();
                Ok(Packet::Data { block, data: cursor.to_vec() })
            },
            Opcode::Ack => {
                if cursor.len() < 2 {
                    return Err(Error::InvalidTftp("ack packet too short"));
                }
                Ok(Packet::Ack { block: cursor.get_u16() })
            },
            Opcode::Error => {
                if cursor.len() < 2 {
                    return Err(Error::InvalidTftp("error packet too short"));
                }
                let code = ErrorCode::from(cursor.get_u16());
                let message = cursor
                    .split(|&b| b == 0)
                    .next()
                    .map(|b| String::from_utf8_lossy(b).into_owned())
                    .unwrap_or_default();
                Ok(Packet::Error { code, message })
            },
        }
    }

    fn parse_request(src: &[u8]) -> Result<(String, String)> {
        let mut parts = src.split(|&b| b == 0);

        let filename = parts
            .next()
            .filter(|b| !b.is_empty())
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .ok_or(Error::InvalidTftp("missing filename"))?;
        let mode = parts
            .next()
            .filter(|b| !b.is_empty())
            .map(|b| String::from_utf8_lossy(b).to_lowercase())
            .ok_or(Error::InvalidTftp("missing mode"))?;

        Ok((filename, mode))
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = BytesMut::new();

        match self {
            Packet::ReadRequest { filename, mode } | Packet::WriteRequest { filename, mode } => {
                let opcode = if let Packet::ReadRequest { .. } = self { Opcode::Rrq } else { Opcode::Wrq };
                buf.put_u16(opcode as u16);
                buf.put_slice(filename.as_bytes());
                buf.put_u8(0);
                buf.put_slice(mode.as_bytes());
                buf.put_u8(0);
            },
            Packet::Data { block, data } => {
                buf.put_u16(Opcode::Data as u16);
                buf.put_u16(*block);
                buf.put_slice(data);
            },
            Packet::Ack { block } => {
                buf.put_u16(Opcode::Ack as u16);
                buf.put_u16(*block);
            },
            Packet::Error { code, message } => {
                buf.put_u16(Opcode::Error as u16);
                buf.put_u16(*code as u16);
                buf.put_slice(message.as_bytes());
                buf.put_u8(0);
            },
        }

        buf.to_vec()
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Packet::Error { code, message: message.into() }
    }
}
