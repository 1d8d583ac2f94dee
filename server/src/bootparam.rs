//! The bootparam RPC service.
//!
//! There is no portmapper registration: clients must be pointed at the configured port.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use netboot_protocol::{
    bootparam::{self, GetfileArgs, GetfileReply, Procedure, WhoamiArgs, WhoamiReply, FILE_ID_ROOT, FILE_ID_SWAP},
    rpc::{accepted_reply, CallHeader, Reader, Writer},
};
use tokio::net::UdpSocket;

use crate::error::Result;

/// The default UDP port of the service.
pub const DEFAULT_PORT: u16 = 10026;

/// The server name used if neither configured nor resolvable from the host.
pub const FALLBACK_SERVER_NAME: &str = "server";

const SIZE_RECEIVE_BUFFER: usize = 2048;

/// Everything the answers depend on, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootparamConfig {
    pub server_name             : String,
    pub server_address          : Ipv4Addr,
    pub domain_name             : String,
    /// The NFS root, answered when no root filesystem is set and for unknown file identifiers.
    pub nfs_root                : String,
    pub rootfs                  : Option<String>,
    pub swap                    : String,
}

/// The host name, or `FALLBACK_SERVER_NAME` if it cannot be read.
pub fn default_server_name() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_SERVER_NAME.to_owned())
}

pub struct BootparamService {
    config                      : BootparamConfig,
}

impl BootparamService {
    pub fn new(config: BootparamConfig) -> Self {
        BootparamService { config }
    }

    /// Returns the reply to `datagram`, or `None` if it must be dropped.
    pub fn handle(&self, datagram: &[u8], source: SocketAddr) -> Option<Vec<u8>> {
        let mut reader = Reader::new(datagram);

        let header = match CallHeader::read(&mut reader) {
            Ok(header) => header,
            Err(error) => {
                debug!("Dropping a datagram from {}: {}", source, error);
                return None;
            },
        };
        debug!("RPC call from {}: {}", source, header);

        if header.program != bootparam::PROGRAM || header.version != bootparam::VERSION {
            info!(
                "Program {} version {} from {} is not served, answering with an empty reply",
                header.program, header.version, source,
            );
            return Some(accepted_reply(header.transaction_id, &[]));
        }

        // credentials and verifier
        for _ in 0..2 {
            if let Err(error) = reader.skip_auth() {
                debug!("Dropping a call from {}: {}", source, error);
                return None;
            }
        }

        let mut body = Writer::new();
        match Procedure::from(header.procedure) {
            Procedure::Whoami => self.whoami(&mut reader, source).write(&mut body),
            Procedure::Getfile => self.getfile(&mut reader).write(&mut body),
            Procedure::Undefined(procedure) => {
                debug!("Unknown procedure {} from {}, answering with an empty reply", procedure, source);
            },
        }

        Some(accepted_reply(header.transaction_id, &body.into_vec()))
    }

    fn whoami(&self, reader: &mut Reader, source: SocketAddr) -> WhoamiReply {
        let client_address = WhoamiArgs::read(reader)
            .client_address
            .unwrap_or_else(|| source_ipv4(source));

        info!("WHOAMI from {}: {}", source, client_address);
        WhoamiReply {
            client_name: client_address.to_string(),
            domain_name: self.config.domain_name.to_owned(),
            router_address: self.config.server_address,
        }
    }

    fn getfile(&self, reader: &mut Reader) -> GetfileReply {
        let args = GetfileArgs::read(reader);
        let path = self.select_path(&args.file_id);

        info!("GETFILE {:?} for {:?}: {}", args.file_id, args.client_name, path);
        GetfileReply {
            server_name: self.config.server_name.to_owned(),
            server_address: self.config.server_address,
            path: path.to_owned(),
        }
    }

    /// Maps a lowercased file identifier to the path answered for it.
    pub fn select_path(&self, file_id: &str) -> &str {
        match file_id {
            FILE_ID_ROOT => self
                .config
                .rootfs
                .as_deref()
                .filter(|rootfs| !rootfs.is_empty())
                .unwrap_or(&self.config.nfs_root),
            FILE_ID_SWAP => &self.config.swap,
            _ => &self.config.nfs_root,
        }
    }
}

fn source_ipv4(source: SocketAddr) -> Ipv4Addr {
    match source.ip() {
        IpAddr::V4(address) => address,
        IpAddr::V6(address) => address.to_ipv4_mapped().unwrap_or(Ipv4Addr::UNSPECIFIED),
    }
}

/// Answers calls on `socket` until it fails.
pub async fn run(socket: UdpSocket, service: BootparamService) -> Result<()> {
    let mut buf = [0u8; SIZE_RECEIVE_BUFFER];
    loop {
        let (length, source) = socket.recv_from(&mut buf).await.map_err(|error| {
            error!("Bootparam socket receive error: {}", error);
            error
        })?;
        trace!("Received {} bytes from {}", length, source);

        let reply = skip_none!(service.handle(&buf[..length], source));
        skip_err!(socket.send_to(&reply, source).await, "Unable to send a bootparam reply to {}", source);
    }
}

#[cfg(test)]
mod tests {
    use netboot_protocol::rpc::{MessageType, Reader, RPC_VERSION};

    use super::*;

    const XID: u32 = 0x1234_5678;
    const SIZE_REPLY_HEADER: usize = 24;

    fn config(rootfs: Option<&str>) -> BootparamConfig {
        BootparamConfig {
            server_name: "bootserver".to_owned(),
            server_address: Ipv4Addr::new(10,0,0,1),
            domain_name: "example.org".to_owned(),
            nfs_root: "/nfsroot".to_owned(),
            rootfs: rootfs.map(ToOwned::to_owned),
            swap: "/export/swap".to_owned(),
        }
    }

    fn source() -> SocketAddr {
        "10.0.0.2:1023".parse().unwrap()
    }

    fn call(program: u32, procedure: u32) -> Writer {
        let mut writer = Writer::new();
        writer.put_u32(XID);
        writer.put_u32(MessageType::Call.into());
        writer.put_u32(RPC_VERSION);
        writer.put_u32(program);
        writer.put_u32(bootparam::VERSION);
        writer.put_u32(procedure);
        // AUTH_UNIX credentials with a 5-byte body, then an AUTH_NULL verifier
        writer.put_u32(1);
        writer.put_opaque(b"abcde");
        writer.put_u32(0);
        writer.put_u32(0);
        writer
    }

    fn getfile(file_id: &str) -> Vec<u8> {
        let mut writer = call(bootparam::PROGRAM, 2);
        writer.put_string("client1");
        writer.put_string(file_id);
        writer.into_vec()
    }

    /// Checks the reply header and returns a reader at the body.
    fn body(reply: &[u8]) -> Reader {
        let mut reader = Reader::new(reply);
        assert_eq!(reader.get_u32().unwrap(), XID);
        assert_eq!(reader.get_u32().unwrap(), 1);
        assert_eq!(reader.get_u32().unwrap(), 0);
        assert_eq!(reader.get_u32().unwrap(), 0);
        assert_eq!(reader.get_u32().unwrap(), 0);
        assert_eq!(reader.get_u32().unwrap(), 0);
        reader
    }

    fn getfile_path(service: &BootparamService, file_id: &str) -> String {
        let reply = service.handle(&getfile(file_id), source()).unwrap();
        let mut reader = body(&reply);
        assert_eq!(reader.get_string().unwrap(), "bootserver");
        assert_eq!(reader.get_ipv4().unwrap(), Ipv4Addr::new(10,0,0,1));
        let path = reader.get_string().unwrap();
        assert_eq!(reader.remaining(), 0);
        path
    }

    #[test]
    fn getfile_root_prefers_rootfs() {
        let service = BootparamService::new(config(Some("/tftpboot/bsd.rd")));
        assert_eq!(getfile_path(&service, "root"), "/tftpboot/bsd.rd");
        assert_eq!(getfile_path(&service, "ROOT"), "/tftpboot/bsd.rd");
    }

    #[test]
    fn getfile_root_falls_back_to_nfs_root() {
        let service = BootparamService::new(config(None));
        assert_eq!(getfile_path(&service, "root"), "/nfsroot");

        let service = BootparamService::new(config(Some("")));
        assert_eq!(getfile_path(&service, "root"), "/nfsroot");
    }

    #[test]
    fn getfile_swap_and_others() {
        let service = BootparamService::new(config(Some("/tftpboot/bsd.rd")));
        assert_eq!(getfile_path(&service, "swap"), "/export/swap");
        assert_eq!(getfile_path(&service, "anything-else"), "/nfsroot");
    }

    #[test]
    fn getfile_without_arguments_asks_for_root() {
        let service = BootparamService::new(config(Some("/tftpboot/bsd.rd")));

        let reply = service.handle(&call(bootparam::PROGRAM, 2).into_vec(), source()).unwrap();
        let mut reader = body(&reply);
        reader.get_string().unwrap();
        reader.get_ipv4().unwrap();
        assert_eq!(reader.get_string().unwrap(), "/tftpboot/bsd.rd");
    }

    #[test]
    fn whoami_prefers_the_address_argument() {
        let service = BootparamService::new(config(None));
        let mut writer = call(bootparam::PROGRAM, 1);
        writer.put_ipv4(Ipv4Addr::new(10,0,0,42));

        let reply = service.handle(&writer.into_vec(), source()).unwrap();
        let mut reader = body(&reply);
        assert_eq!(reader.get_string().unwrap(), "10.0.0.42");
        assert_eq!(reader.get_string().unwrap(), "example.org");
        assert_eq!(reader.get_ipv4().unwrap(), Ipv4Addr::new(10,0,0,1));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn whoami_falls_back_to_the_source_address() {
        let service = BootparamService::new(config(None));

        let reply = service.handle(&call(bootparam::PROGRAM, 1).into_vec(), source()).unwrap();
        assert_eq!(body(&reply).get_string().unwrap(), "10.0.0.2");
    }

    #[test]
    fn answers_foreign_program_and_unknown_procedure_with_empty_body() {
        let service = BootparamService::new(config(None));

        let reply = service.handle(&call(100003, 1).into_vec(), source()).unwrap();
        assert_eq!(reply.len(), SIZE_REPLY_HEADER);
        body(&reply);

        let reply = service.handle(&call(bootparam::PROGRAM, 7).into_vec(), source()).unwrap();
        assert_eq!(reply.len(), SIZE_REPLY_HEADER);
        body(&reply);
    }

    #[test]
    fn drops_malformed_calls() {
        let service = BootparamService::new(config(None));
        let datagram = getfile("root");

        // a reply instead of a call
        let mut reply = datagram.clone();
        reply[7] = 1;
        assert!(service.handle(&reply, source()).is_none());

        // RPC version 3
        let mut version = datagram.clone();
        version[11] = 3;
        assert!(service.handle(&version, source()).is_none());

        // cut inside the header and inside the credentials
        assert!(service.handle(&datagram[..10], source()).is_none());
        assert!(service.handle(&datagram[..30], source()).is_none());
        assert!(service.handle(&[], source()).is_none());
    }

    #[tokio::test]
    async fn answers_over_udp() {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let address = socket.local_addr().unwrap();
        tokio::spawn(run(socket, BootparamService::new(config(None))));

        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        client.send_to(&getfile("swap"), address).await.unwrap();

        let mut buf = [0u8; 512];
        let (length, from) = client.recv_from(&mut buf).await.unwrap();
        assert_eq!(from, address);

        let mut reader = body(&buf[..length]);
        reader.get_string().unwrap();
        reader.get_ipv4().unwrap();
        assert_eq!(reader.get_string().unwrap(), "/export/swap");
    }
}
