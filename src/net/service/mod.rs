//! Frame processing services.
//!
//! The `service` module holds the receive side of the daemon: a loop pulling
//! raw frames off a link, a dispatcher routing decoded Ethernet frames by
//! EtherType, and protocol handlers registered with the dispatcher.

pub mod arp;
pub mod ethernet;
pub mod recv;

use crate::net::repr::Error as DecodeError;
use crate::net::service::arp::Error as ArpError;

#[derive(Debug)]
pub enum Error {
    /// Indicates a frame that could not be decoded.
    Decode(DecodeError),
    /// Indicates an ARP packet that was rejected or could not be answered.
    Arp(ArpError),
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Error::Decode(err)
    }
}

impl From<ArpError> for Error {
    fn from(err: ArpError) -> Self {
        Error::Arp(err)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::Decode(ref err) => write!(f, "decode failed: {}", err),
            Error::Arp(ref err) => write!(f, "ARP: {}", err),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// A protocol handler fed with the payload of Ethernet frames of a single
/// EtherType.
pub trait Handler {
    /// Processes the payload of an Ethernet frame.
    fn recv(&mut self, payload: &[u8]) -> Result<()>;
}
