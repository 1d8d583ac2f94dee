//! The diskless client boot server: RARP, bootparam and TFTP.

#[macro_use] extern crate log;

#[macro_use] mod macros;
pub mod allocator;
pub mod bootparam;
pub mod error;
pub mod mapping;
pub mod pool;
pub mod rarp;
pub mod tftp;

pub use self::{
    allocator::Allocator,
    bootparam::{BootparamConfig, BootparamService},
    error::{Error, Result},
    mapping::StaticMapping,
    pool::AddressPool,
    rarp::{Engine, LinkSocket, Resolver, Source},
    tftp::TftpConfig,
};
