//! Serialization and deserialization of network frames.
//!
//! The `repr` module provides views over byte buffers for decoding frames and
//! packets at the link layer, and the few writers needed to build replies.
//! Decoding is all-or-nothing: a view is either constructed over a buffer
//! that satisfies its length contract, or an error is returned.

pub mod arp;
pub mod ethernet;
pub mod ipv4;

pub use self::arp::{
    hw_types as arp_hw_types,
    proto_types as arp_proto_types,
    Arp,
    Frame as ArpFrame,
    HwType as ArpHwType,
    Ipv4Binding as ArpIpv4Binding,
    Op as ArpOp,
    ProtoType as ArpProtoType,
};
pub use self::ethernet::{
    Address as EthernetAddress,
    EtherType,
    Frame as EthernetFrame,
};
pub use self::ipv4::{
    Address as Ipv4Address,
    AddressCidr as Ipv4AddressCidr,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Indicates a buffer too short to hold a fixed size header.
    Truncated,
    /// Indicates a length field describing data past the end of the buffer.
    OutOfBounds,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::Truncated => write!(f, "buffer truncated"),
            Error::OutOfBounds => write!(f, "length field out of bounds"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
