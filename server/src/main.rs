//! The `netbootd` daemon.

#[macro_use] extern crate log;

use std::{
    env,
    io,
    net::SocketAddr,
    path::PathBuf,
    process,
};

use clap::Parser;
use netboot_packet::{Interface, RawSocket};
use netboot_protocol::rarp::ETHERTYPE_RARP;
use netboot_server::{
    bootparam,
    tftp,
    Allocator,
    BootparamConfig,
    BootparamService,
    Engine,
    Resolver,
    Result,
    StaticMapping,
    TftpConfig,
};
use tokio::net::UdpSocket;

/// Boots diskless clients with RARP, bootparam and TFTP.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The interface to answer RARP requests on
    #[arg(short, long, env = "NETBOOT_INTERFACE", default_value = "eth0")]
    interface: String,

    /// Static assignments, e.g. 52:54:00:12:34:56=192.168.1.10,aa:bb:cc:dd:ee:ff=192.168.1.11
    #[arg(long, env = "NETBOOT_MAP")]
    map: Option<String>,

    /// The CIDR to assign addresses from to unmapped clients
    #[arg(long, env = "NETBOOT_POOL")]
    pool: Option<String>,

    #[arg(long, default_value = "0.0.0.0:69")]
    tftp_addr: SocketAddr,

    #[arg(long, default_value = ".")]
    tftp_root: PathBuf,

    /// The image served for IP-hex file names
    #[arg(long)]
    tftp_default: Option<PathBuf>,

    #[arg(long)]
    tftp_disable: bool,

    #[arg(long, default_value_t = SocketAddr::from(([0, 0, 0, 0], bootparam::DEFAULT_PORT)))]
    bootparam_addr: SocketAddr,

    /// The NFS root answered when no root filesystem is set
    #[arg(long, default_value = "/nfsroot")]
    bootparam_root: String,

    /// The root filesystem answered for `root`, e.g. ./bsd.rd
    #[arg(long)]
    rootfs: Option<String>,

    /// The path answered for `swap`
    #[arg(long)]
    swap: Option<String>,

    /// The server name in bootparam replies, the host name by default
    #[arg(long)]
    server_name: Option<String>,

    /// Logs every ignored frame and dropped datagram
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(error) = serve(args).await {
        error!("{}", error);
        process::exit(1);
    }
}

async fn serve(args: Args) -> Result<()> {
    let interface = Interface::by_name(&args.interface)?;
    info!("Using {}", interface);

    let mapping: StaticMapping = args.map.as_deref().unwrap_or_default().parse()?;
    let allocator = match args.pool {
        Some(ref cidr) => Some(Allocator::new(cidr.parse()?)),
        None => None,
    };
    match allocator {
        Some(ref allocator) => info!("{} static entries, dynamic pool {}", mapping.len(), allocator.pool()),
        None => info!("{} static entries, no dynamic pool", mapping.len()),
    }
    let resolver = Resolver::new(mapping, allocator, interface.ipv4_address);

    let raw_socket = RawSocket::bind(&interface, ETHERTYPE_RARP)?;

    if args.tftp_disable {
        info!("TFTP is disabled");
    } else {
        let socket = UdpSocket::bind(args.tftp_addr).await?;
        let config = TftpConfig {
            root: args.tftp_root,
            default_image: args.tftp_default,
        };
        tokio::spawn(async move {
            if let Err(error) = tftp::run(socket, config).await {
                error!("TFTP server stopped: {}", error);
            }
        });
    }

    let socket = UdpSocket::bind(args.bootparam_addr).await?;
    let config = BootparamConfig {
        server_name: args.server_name.unwrap_or_else(bootparam::default_server_name),
        server_address: interface.ipv4_address,
        domain_name: env::var("DOMAINNAME").unwrap_or_default(),
        nfs_root: args.bootparam_root,
        rootfs: args.rootfs,
        swap: args.swap.unwrap_or_default(),
    };
    info!(
        "Serving bootparam on {} as {} (root {:?}, rootfs {:?}, swap {:?})",
        args.bootparam_addr, config.server_name, config.nfs_root, config.rootfs, config.swap,
    );
    tokio::spawn(async move {
        if let Err(error) = bootparam::run(socket, BootparamService::new(config)).await {
            error!("Bootparam service stopped: {}", error);
        }
    });

    let mut engine = Engine::new(raw_socket, resolver, interface.hardware_address, interface.ipv4_address);
    tokio::task::spawn_blocking(move || engine.run())
        .await
        .map_err(|error| io::Error::new(io::ErrorKind::Other, error))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_the_well_known_ports() {
        let args = Args::try_parse_from(vec!["netbootd"]).unwrap();

        assert_eq!(args.interface, "eth0");
        assert_eq!(args.bootparam_addr, "0.0.0.0:10026".parse().unwrap());
        assert_eq!(args.bootparam_addr.port(), bootparam::DEFAULT_PORT);
        assert_eq!(args.tftp_addr.port(), 69);
        assert!(!args.verbose);
    }

    #[test]
    fn reads_flags() {
        let args = Args::try_parse_from(vec![
            "netbootd",
            "-i", "em0",
            "--map", "52:54:00:12:34:56=10.0.0.2",
            "--bootparam-addr", "127.0.0.1:20026",
            "--tftp-disable",
            "-v",
        ]).unwrap();

        assert_eq!(args.interface, "em0");
        assert_eq!(args.map.as_deref(), Some("52:54:00:12:34:56=10.0.0.2"));
        assert_eq!(args.bootparam_addr, "127.0.0.1:20026".parse().unwrap());
        assert!(args.tftp_disable);
        assert!(args.verbose);
    }
}
