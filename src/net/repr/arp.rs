use std::fmt::{
    Display,
    Formatter,
    Result as FmtResult,
};

use byteorder::{
    ByteOrder,
    NetworkEndian,
};

use crate::net::repr::{
    EthernetAddress,
    Error,
    Ipv4Address,
    Result,
};

#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
// https://www.iana.org/assignments/arp-parameters/arp-parameters.xhtml#arp-parameters-1
pub enum Op {
    Request = 0x0001,
    Reply = 0x0002,
}

/// Hardware type code of an ARP packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HwType(pub u16);

impl Display for HwType {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match *self {
            hw_types::ETHERNET => write!(f, "Ethernet"),
            HwType(code) => write!(f, "{}", code),
        }
    }
}

/// Protocol type code of an ARP packet. Codes share the EtherType space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProtoType(pub u16);

impl Display for ProtoType {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match *self {
            proto_types::IPV4 => write!(f, "IPv4"),
            ProtoType(code) => write!(f, "{}", code),
        }
    }
}

/// https://www.iana.org/assignments/arp-parameters/arp-parameters.xhtml#arp-parameters-2
pub mod hw_types {
    use super::HwType;

    pub const ETHERNET: HwType = HwType(0x0001);
}

/// https://www.iana.org/assignments/arp-parameters/arp-parameters.xhtml#arp-parameters-3
pub mod proto_types {
    use super::ProtoType;

    pub const IPV4: ProtoType = ProtoType(0x0800);
}

mod fields {
    use std::ops::{
        Range,
        RangeFrom,
    };

    pub const HW_TYPE: Range<usize> = 0 .. 2;

    pub const PROTO_TYPE: Range<usize> = 2 .. 4;

    pub const HW_LEN: usize = 4;

    pub const PROTO_LEN: usize = 5;

    pub const OP: Range<usize> = 6 .. 8;

    pub const DATA: RangeFrom<usize> = 8 ..;
}

/// View of a byte buffer as an ARP packet.
///
/// Only the fixed 8 byte header is checked on construction. The address data
/// section is sized by the two length fields and is bounds checked by
/// `ipv4_binding()` before it is sliced.
#[derive(Debug)]
pub struct Frame<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> Frame<T> {
    pub const HEADER_LEN: usize = 8;

    /// Tries to create an ARP packet view over a byte buffer.
    pub fn try_new(buffer: T) -> Result<Frame<T>> {
        if buffer.as_ref().len() < Self::HEADER_LEN {
            Err(Error::Truncated)
        } else {
            Ok(Frame { buffer })
        }
    }

    pub fn hw_type(&self) -> HwType {
        HwType(NetworkEndian::read_u16(&self.buffer.as_ref()[fields::HW_TYPE]))
    }

    pub fn proto_type(&self) -> ProtoType {
        ProtoType(NetworkEndian::read_u16(
            &self.buffer.as_ref()[fields::PROTO_TYPE],
        ))
    }

    pub fn hw_len(&self) -> u8 {
        self.buffer.as_ref()[fields::HW_LEN]
    }

    pub fn proto_len(&self) -> u8 {
        self.buffer.as_ref()[fields::PROTO_LEN]
    }

    /// Returns the raw operation code; see `Op` for the known values.
    pub fn op(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[fields::OP])
    }

    /// Returns the address data section, which may be shorter than the
    /// length fields claim.
    pub fn data(&self) -> &[u8] {
        &self.buffer.as_ref()[fields::DATA]
    }

    /// Returns the number of data bytes the length fields describe.
    pub fn data_len(&self) -> usize {
        2 * self.hw_len() as usize + 2 * self.proto_len() as usize
    }

    /// Returns a view of the sender/target addresses for IPv4 packets.
    ///
    /// Returns `None` if the protocol type is not IPv4 or if the data section
    /// is too short for the advertised address lengths.
    pub fn ipv4_binding(&self) -> Option<Ipv4Binding> {
        if self.proto_type() != proto_types::IPV4 || self.data().len() < self.data_len() {
            return None;
        }

        let hw_len = self.hw_len() as usize;
        let proto_len = self.proto_len() as usize;
        let data = self.data();

        let (sender_hw_addr, data) = data.split_at(hw_len);
        let (sender_proto_addr, data) = data.split_at(proto_len);
        let (target_hw_addr, data) = data.split_at(hw_len);
        let target_proto_addr = &data[.. proto_len];

        Some(Ipv4Binding {
            sender_hw_addr,
            sender_proto_addr,
            target_hw_addr,
            target_proto_addr,
        })
    }
}

impl<T: AsRef<[u8]>> Display for Frame<T> {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "[ARP]: hw {} ({}) proto {} ({}) op {} data [",
            self.hw_type(),
            self.hw_len(),
            self.proto_type(),
            self.proto_len(),
            self.op()
        )?;
        match self.ipv4_binding() {
            Some(binding) => write!(f, "{}]", binding),
            None => write!(f, "<?>]"),
        }
    }
}

/// Sender and target addresses of an IPv4 ARP packet, borrowed from the
/// packet's data section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ipv4Binding<'a> {
    pub sender_hw_addr: &'a [u8],
    pub sender_proto_addr: &'a [u8],
    pub target_hw_addr: &'a [u8],
    pub target_proto_addr: &'a [u8],
}

impl<'a> Display for Ipv4Binding<'a> {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "src ")?;
        write_hw_addr(f, self.sender_hw_addr)?;
        write!(f, " ")?;
        write_proto_addr(f, self.sender_proto_addr)?;
        write!(f, " dst ")?;
        write_hw_addr(f, self.target_hw_addr)?;
        write!(f, " ")?;
        write_proto_addr(f, self.target_proto_addr)
    }
}

fn write_hw_addr(f: &mut Formatter, addr: &[u8]) -> FmtResult {
    for (i, byte) in addr.iter().enumerate() {
        if i > 0 {
            write!(f, ":")?;
        }
        write!(f, "{:02X}", byte)?;
    }
    Ok(())
}

fn write_proto_addr(f: &mut Formatter, addr: &[u8]) -> FmtResult {
    for (i, byte) in addr.iter().enumerate() {
        if i > 0 {
            write!(f, ".")?;
        }
        write!(f, "{}", byte)?;
    }
    Ok(())
}

/// An ARP packet to be serialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arp {
    EthernetIpv4 {
        op: Op,
        source_hw_addr: EthernetAddress,
        source_proto_addr: Ipv4Address,
        target_hw_addr: EthernetAddress,
        target_proto_addr: Ipv4Address,
    },
}

impl Arp {
    /// Returns the size of the ARP packet when serialized to a buffer.
    pub fn buffer_len(&self) -> usize {
        8 + match *self {
            Arp::EthernetIpv4 { .. } => 20,
        }
    }

    /// Serializes the ARP packet into a buffer.
    ///
    /// Fails with `Error::Truncated` if the buffer is shorter than
    /// `buffer_len()`.
    pub fn serialize(&self, buffer: &mut [u8]) -> Result<()> {
        if self.buffer_len() > buffer.len() {
            return Err(Error::Truncated);
        }

        match *self {
            Arp::EthernetIpv4 {
                op,
                ref source_hw_addr,
                ref source_proto_addr,
                ref target_hw_addr,
                ref target_proto_addr,
            } => {
                NetworkEndian::write_u16(&mut buffer[fields::HW_TYPE], hw_types::ETHERNET.0);
                NetworkEndian::write_u16(&mut buffer[fields::PROTO_TYPE], proto_types::IPV4.0);
                buffer[fields::HW_LEN] = 6;
                buffer[fields::PROTO_LEN] = 4;
                NetworkEndian::write_u16(&mut buffer[fields::OP], op as u16);
                buffer[8 .. 14].copy_from_slice(source_hw_addr.as_bytes());
                buffer[14 .. 18].copy_from_slice(source_proto_addr.as_bytes());
                buffer[18 .. 24].copy_from_slice(target_hw_addr.as_bytes());
                buffer[24 .. 28].copy_from_slice(target_proto_addr.as_bytes());
            }
        };

        Ok(())
    }
}
