//! Daemon configuration.

use std::path::PathBuf;

use crate::net::pipeline;
use crate::net::repr::{
    EthernetAddress,
    Ipv4Address,
    Ipv4AddressCidr,
};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// Indicates a value that could not be parsed for the named setting.
    Invalid(&'static str, String),
    /// Indicates a required setting was not provided.
    Missing(&'static str),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::Invalid(name, ref value) => write!(f, "invalid {}: {:?}", name, value),
            Error::Missing(name) => write!(f, "missing {}", name),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// Where the TAP device lives and how the host side is configured.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Path of the clone device, created if absent.
    pub path: PathBuf,
    pub major: u32,
    pub minor: u32,
    /// Interface name to request; the kernel picks one if `None`.
    pub ifname: Option<String>,
    /// Route added through the interface.
    pub route: Ipv4AddressCidr,
    /// Address assigned to the host side of the interface.
    pub local_addr: Ipv4AddressCidr,
}

impl Default for DeviceConfig {
    fn default() -> DeviceConfig {
        DeviceConfig {
            path: PathBuf::from("/dev/net/tap"),
            major: 10,
            minor: 200,
            ifname: None,
            route: Ipv4AddressCidr::new(Ipv4Address::new([10, 0, 0, 0]), 24),
            local_addr: Ipv4AddressCidr::new(Ipv4Address::new([10, 0, 0, 5]), 32),
        }
    }
}

/// Addresses the stack answers for on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackConfig {
    pub ethernet_addr: EthernetAddress,
    pub ipv4_addr: Ipv4Address,
}

impl Default for StackConfig {
    fn default() -> StackConfig {
        StackConfig {
            ethernet_addr: EthernetAddress::new([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]),
            ipv4_addr: Ipv4Address::new([10, 0, 0, 4]),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub device: DeviceConfig,
    pub stack: StackConfig,
    pub pipeline: pipeline::Options,
}

/// Parses `value` as the setting `name`.
pub fn parse<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Invalid(name, value.to_string()))
}
