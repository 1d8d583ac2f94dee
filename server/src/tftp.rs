//! The read-only TFTP server handing out boot images.
//!
//! A client asking for its own address in hexadecimal (`C0A8010A` for
//! `192.168.1.10`) receives the default image. Any other name is looked up
//! in the root directory by its last path component.

use std::{
    io,
    net::{Ipv4Addr, SocketAddr},
    path::{Component, Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use bytes::Bytes;
use netboot_protocol::tftp::{ErrorCode, Packet, BLOCK_SIZE};
use tokio::{
    net::UdpSocket,
    time::{self, Instant},
};

use crate::error::Result;

/// How long to wait for an acknowledgement before retransmitting.
pub const TIMEOUT: Duration = Duration::from_secs(5);

/// Retransmissions of one block before the transfer is abandoned.
pub const MAX_RETRIES: usize = 5;

const SIZE_RECEIVE_BUFFER: usize = 1024;

/// Whether `name` is exactly 8 hexadecimal digits in any case.
pub fn is_hex_ipv4_name(name: &str) -> bool {
    name.len() == 8 && name.bytes().all(|byte| byte.is_ascii_hexdigit())
}

/// The uppercase 8-digit hexadecimal form of `address`.
pub fn ipv4_to_hex(address: Ipv4Addr) -> String {
    format!("{:08X}", u32::from(address))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TftpConfig {
    pub root                    : PathBuf,
    /// Served for IP-hex names, as is.
    pub default_image           : Option<PathBuf>,
}

impl TftpConfig {
    /// Maps a requested file name to the file to send.
    pub fn resolve(&self, filename: &str) -> std::result::Result<PathBuf, ErrorCode> {
        let name = match Path::new(filename.trim()).components().next_back() {
            Some(Component::Normal(name)) => name,
            Some(Component::ParentDir) => return Err(ErrorCode::AccessViolation),
            _ => return Err(ErrorCode::FileNotFound),
        };

        if name.to_str().map_or(false, is_hex_ipv4_name) {
            return self.default_image.clone().ok_or(ErrorCode::FileNotFound);
        }

        let path = self.root.join(name);
        if !path.starts_with(&self.root) {
            return Err(ErrorCode::AccessViolation);
        }
        Ok(path)
    }
}

/// Serves read requests arriving on `socket` until it fails.
///
/// Every transfer runs on its own task and socket.
pub async fn run(socket: UdpSocket, config: TftpConfig) -> Result<()> {
    let config = Arc::new(config);
    let local = socket.local_addr()?;
    info!("Serving TFTP on {} from {}", local, config.root.display());

    let mut buf = [0u8; SIZE_RECEIVE_BUFFER];
    loop {
        let (length, client) = socket.recv_from(&mut buf).await.map_err(|error| {
            error!("TFTP socket receive error: {}", error);
            error
        })?;

        match skip_err!(Packet::parse(&buf[..length]), "Invalid TFTP packet from {}", client) {
            Packet::ReadRequest { filename, mode } => {
                debug!("Read request for {:?} ({}) from {}", filename, mode, client);
                let config = config.clone();
                tokio::spawn(async move {
                    if let Err(error) = transfer(&config, SocketAddr::new(local.ip(), 0), client, &filename).await {
                        warn!("Transfer of {:?} to {} failed: {}", filename, client, error);
                    }
                });
            },
            Packet::WriteRequest { filename, .. } => {
                info!("Refusing to write {:?} from {}", filename, client);
                let reply = Packet::error(ErrorCode::AccessViolation, "Write requests are not allowed");
                skip_err!(socket.send_to(&reply.encode(), client).await, "Unable to send a TFTP error to {}", client);
            },
            packet => debug!("Ignoring {:?} from {} outside of a transfer", packet, client),
        }
    }
}

enum Ack {
    Received,
    TimedOut,
    Aborted,
}

async fn transfer(config: &TftpConfig, bind: SocketAddr, client: SocketAddr, filename: &str) -> Result<()> {
    let socket = UdpSocket::bind(bind).await?;

    let path = match config.resolve(filename) {
        Ok(path) => path,
        Err(code) => {
            info!("Unable to serve {:?} to {}: {:?}", filename, client, code);
            socket.send_to(&Packet::error(code, "File not available").encode(), client).await?;
            return Ok(());
        },
    };
    let data = match tokio::fs::read(&path).await {
        Ok(data) => Bytes::from(data),
        Err(error) => {
            info!("Unable to read {} for {}: {}", path.display(), client, error);
            socket.send_to(&Packet::error(error_code(&error), error.to_string()).encode(), client).await?;
            return Ok(());
        },
    };
    info!("Sending {} ({} bytes) to {}", path.display(), data.len(), client);

    let mut block: u16 = 1;
    let mut offset = 0;
    loop {
        let end = (offset + BLOCK_SIZE).min(data.len());
        let packet = Packet::Data {
            block,
            data: data.slice(offset..end).to_vec(),
        }.encode();

        let mut retries = 0;
        loop {
            socket.send_to(&packet, client).await?;
            match wait_for_ack(&socket, client, block).await? {
                Ack::Received => break,
                Ack::Aborted => return Ok(()),
                Ack::TimedOut if retries < MAX_RETRIES => {
                    retries += 1;
                    debug!("Retransmitting block {} to {} ({})", block, client, retries);
                },
                Ack::TimedOut => {
                    warn!("{} stopped acknowledging {}", client, path.display());
                    return Ok(());
                },
            }
        }

        if end - offset < BLOCK_SIZE {
            break;
        }
        offset = end;
        block = block.wrapping_add(1);
    }

    info!("Sent {} to {}", path.display(), client);
    Ok(())
}

async fn wait_for_ack(socket: &UdpSocket, client: SocketAddr, block: u16) -> io::Result<Ack> {
    let deadline = Instant::now() + TIMEOUT;
    let mut buf = [0u8; SIZE_RECEIVE_BUFFER];
    loop {
        let (length, from) = match time::timeout_at(deadline, socket.recv_from(&mut buf)).await {
            Ok(received) => received?,
            Err(_) => return Ok(Ack::TimedOut),
        };

        if from != client {
            let reply = Packet::error(ErrorCode::UnknownTransferId, "Unknown transfer ID");
            socket.send_to(&reply.encode(), from).await?;
            continue;
        }

        match Packet::parse(&buf[..length]) {
            Ok(Packet::Ack { block: acknowledged }) if acknowledged == block => return Ok(Ack::Received),
            Ok(Packet::Error { code, message }) => {
                warn!("{} aborted the transfer: {:?} {}", client, code, message);
                return Ok(Ack::Aborted);
            },
            _ => trace!("Ignoring a stray packet from {} while waiting for block {}", client, block),
        }
    }
}

fn error_code(error: &io::Error) -> ErrorCode {
    match error.kind() {
        io::ErrorKind::NotFound => ErrorCode::FileNotFound,
        io::ErrorKind::PermissionDenied => ErrorCode::AccessViolation,
        _ => ErrorCode::NotDefined,
    }
}
