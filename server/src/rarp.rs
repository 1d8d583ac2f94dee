//! The RARP engine.

use std::{fmt, io, net::Ipv4Addr};

use eui48::MacAddress;
use netboot_packet::RawSocket;
use netboot_protocol::rarp::{self, Operation, RarpPacket};

use crate::{
    allocator::Allocator,
    error::Result,
    mapping::StaticMapping,
};

/// Enough for any Ethernet frame without jumbo support.
const SIZE_RECEIVE_BUFFER: usize = 2048;

/// The link-layer transport of the engine.
pub trait LinkSocket {
    /// Blocks until a frame arrives. An error ends the engine.
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    fn send_to(&mut self, frame: &[u8], destination: MacAddress) -> io::Result<usize>;
}

impl LinkSocket for RawSocket {
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        RawSocket::recv(self, buf).map_err(into_io)
    }

    fn send_to(&mut self, frame: &[u8], destination: MacAddress) -> io::Result<usize> {
        RawSocket::send_to(self, frame, destination).map_err(into_io)
    }
}

fn into_io(error: netboot_packet::Error) -> io::Error {
    match error {
        netboot_packet::Error::Io(error) => error,
        error => io::Error::new(io::ErrorKind::Other, error),
    }
}

/// Where a resolved address came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Static,
    Dynamic,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Source::Static => write!(f, "static"),
            Source::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// Resolves hardware addresses with the static mapping first and the allocator second.
pub struct Resolver {
    mapping                 : StaticMapping,
    allocator               : Option<Allocator>,
}

impl Resolver {
    /// Reserves `server_address` and every statically mapped address in the allocator.
    pub fn new(mapping: StaticMapping, allocator: Option<Allocator>, server_address: Ipv4Addr) -> Self {
        let allocator = allocator.map(|mut allocator| {
            allocator.reserve(server_address);
            for (_, address) in mapping.iter() {
                allocator.reserve(*address);
            }
            allocator
        });

        Resolver { mapping, allocator }
    }

    pub fn resolve(&mut self, mac: MacAddress) -> Option<(Ipv4Addr, Source)> {
        if let Some(address) = self.mapping.get(&mac) {
            return Some((address, Source::Static));
        }
        self.allocator
            .as_mut()?
            .allocate(mac)
            .map(|address| (address, Source::Dynamic))
    }
}

/// Answers RARP requests on one link.
pub struct Engine<S> {
    socket                  : S,
    resolver                : Resolver,
    hardware_address        : MacAddress,
    ipv4_address            : Ipv4Addr,
}

impl<S: LinkSocket> Engine<S> {
    /// `hardware_address` and `ipv4_address` are the server's own, sent as the reply sender.
    pub fn new(socket: S, resolver: Resolver, hardware_address: MacAddress, ipv4_address: Ipv4Addr) -> Self {
        Engine {
            socket,
            resolver,
            hardware_address,
            ipv4_address,
        }
    }

    /// Reads frames until the socket fails.
    pub fn run(&mut self) -> Result<()> {
        info!(
            "Answering RARP requests as {} ({})",
            self.ipv4_address,
            self.hardware_address.to_hex_string(),
        );

        let mut buf = [0u8; SIZE_RECEIVE_BUFFER];
        loop {
            let length = self.socket.recv(&mut buf).map_err(|error| {
                error!("Raw socket receive error: {}", error);
                error
            })?;

            let (destination, reply) = skip_none!(self.handle(&buf[..length]));
            if let Err(error) = self.socket.send_to(&reply, destination) {
                warn!("Unable to send a RARP reply to {}: {}", destination.to_hex_string(), error);
            }
        }
    }

    /// Returns the reply frame and its link-layer destination, or `None` if the frame is ignored.
    pub fn handle(&mut self, frame: &[u8]) -> Option<(MacAddress, Vec<u8>)> {
        let (_, packet) = match rarp::decode(frame) {
            Ok(decoded) => decoded,
            Err(error) => {
                debug!("Ignoring a frame: {}", error);
                return None;
            },
        };
        trace!("{}", packet);

        if packet.operation != Operation::RarpRequest {
            debug!("Ignoring a RARP frame with operation {:?}", packet.operation);
            return None;
        }

        self.answer(&packet)
    }

    fn answer(&mut self, packet: &RarpPacket) -> Option<(MacAddress, Vec<u8>)> {
        let client = packet.target_hardware_address;
        let (address, source) = match self.resolver.resolve(client) {
            Some(resolved) => resolved,
            None => {
                info!("No address available for {}", client.to_hex_string());
                return None;
            },
        };

        info!("Answering {} with {} ({})", client.to_hex_string(), address, source);
        let reply = rarp::encode(self.hardware_address, self.ipv4_address, client, address);
        Some((client, reply))
    }
}
