use std::fmt::{
    Display,
    Formatter,
    Result as FmtResult,
};
use std::result::Result as StdResult;
use std::str::FromStr;

use byteorder::{
    ByteOrder,
    NetworkEndian,
};

use crate::net::repr::{
    Error,
    Result,
};

/// [MAC address](https://en.wikipedia.org/wiki/MAC_address) in network byte order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Address([u8; 6]);

impl Address {
    pub const BROADCAST: Address = Address([0xFF; 6]);

    /// Creates a MAC address from a network byte order buffer.
    pub fn new(addr: [u8; 6]) -> Address {
        Address(addr)
    }

    /// Tries to create a MAC address from a network byte order slice.
    pub fn try_new(addr: &[u8]) -> Result<Address> {
        if addr.len() != 6 {
            return Err(Error::OutOfBounds);
        }

        let mut _addr: [u8; 6] = [0; 6];
        _addr.copy_from_slice(addr);
        Ok(Address(_addr))
    }

    /// Returns a reference to the network byte order representation of the
    /// address.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Checks if this is a broadcast address.
    pub fn is_broadcast(&self) -> bool {
        self.0 == [0xFF; 6]
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5],
        )
    }
}

impl FromStr for Address {
    type Err = ();

    /// Parses a MAC address from an A:B:C:D:E:F style string.
    fn from_str(addr: &str) -> StdResult<Address, Self::Err> {
        let mut mac: [u8; 6] = [0; 6];
        let mut tokens = addr.split(':');

        for byte in mac.iter_mut() {
            let token = tokens.next().ok_or(())?;
            if token.is_empty() || token.len() > 2 {
                return Err(());
            }
            *byte = u8::from_str_radix(token, 16).map_err(|_| ())?;
        }

        if tokens.next().is_some() {
            return Err(());
        }

        Ok(Address::new(mac))
    }
}

/// [EtherType](https://en.wikipedia.org/wiki/EtherType) code of an Ethernet
/// frame's payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EtherType(pub u16);

impl EtherType {
    pub const ARP: EtherType = EtherType(0x0806);
}

impl Display for EtherType {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match *self {
            EtherType::ARP => write!(f, "ARP"),
            EtherType(code) => write!(f, "{:04x}", code),
        }
    }
}

mod fields {
    use std::ops::{
        Range,
        RangeFrom,
    };

    pub const DST_ADDR: Range<usize> = 0 .. 6;

    pub const SRC_ADDR: Range<usize> = 6 .. 12;

    pub const ETHER_TYPE: Range<usize> = 12 .. 14;

    pub const PAYLOAD: RangeFrom<usize> = 14 ..;
}

/// View of a byte buffer as an Ethernet frame.
#[derive(Debug)]
pub struct Frame<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> AsRef<[u8]> for Frame<T> {
    fn as_ref(&self) -> &[u8] {
        self.buffer.as_ref()
    }
}

impl<T: AsRef<[u8]>> Frame<T> {
    pub const HEADER_LEN: usize = 14;

    /// Largest frame read from or written to a device, including an 802.1Q
    /// tag.
    pub const MAX_FRAME_LEN: usize = 1522;

    /// Tries to create an Ethernet frame view over a byte buffer.
    ///
    /// Fails with `Error::Truncated` if the buffer cannot hold a header.
    pub fn try_new(buffer: T) -> Result<Frame<T>> {
        if buffer.as_ref().len() < Self::HEADER_LEN {
            Err(Error::Truncated)
        } else {
            Ok(Frame { buffer })
        }
    }

    /// Returns the length of an Ethernet frame with the specified payload size.
    pub fn buffer_len(payload_len: usize) -> usize {
        Self::HEADER_LEN + payload_len
    }

    pub fn dst_addr(&self) -> Address {
        let mut addr = [0; 6];
        addr.copy_from_slice(&self.buffer.as_ref()[fields::DST_ADDR]);
        Address(addr)
    }

    pub fn src_addr(&self) -> Address {
        let mut addr = [0; 6];
        addr.copy_from_slice(&self.buffer.as_ref()[fields::SRC_ADDR]);
        Address(addr)
    }

    pub fn ether_type(&self) -> EtherType {
        EtherType(NetworkEndian::read_u16(
            &self.buffer.as_ref()[fields::ETHER_TYPE],
        ))
    }

    pub fn payload(&self) -> &[u8] {
        &self.buffer.as_ref()[fields::PAYLOAD]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Frame<T> {
    pub fn set_dst_addr(&mut self, addr: Address) {
        self.buffer.as_mut()[fields::DST_ADDR].copy_from_slice(addr.as_bytes());
    }

    pub fn set_src_addr(&mut self, addr: Address) {
        self.buffer.as_mut()[fields::SRC_ADDR].copy_from_slice(addr.as_bytes());
    }

    pub fn set_ether_type(&mut self, ether_type: EtherType) {
        NetworkEndian::write_u16(
            &mut self.buffer.as_mut()[fields::ETHER_TYPE],
            ether_type.0,
        );
    }

    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.buffer.as_mut()[fields::PAYLOAD]
    }
}

impl<T: AsRef<[u8]>> Display for Frame<T> {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "src {} dest {} type {} payload size {}",
            self.src_addr(),
            self.dst_addr(),
            self.ether_type(),
            self.payload().len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arp_frame_bytes() -> Vec<u8> {
        let mut buffer = vec![0xDD; 6];
        buffer.extend_from_slice(&[0x0A; 6]);
        buffer.extend_from_slice(&[0x08, 0x06]);
        buffer.extend_from_slice(&[1, 2, 3, 4]);
        buffer
    }

    #[test]
    fn test_try_new_truncated() {
        for len in 0 .. 14 {
            let buffer = vec![0; len];
            assert_matches!(Frame::try_new(&buffer[..]), Err(Error::Truncated));
        }
    }

    #[test]
    fn test_try_new_header_only() {
        let buffer = [0; 14];
        let frame = Frame::try_new(&buffer[..]).unwrap();
        assert!(frame.payload().is_empty());
    }

    #[test]
    fn test_fields() {
        let buffer = arp_frame_bytes();
        let frame = Frame::try_new(&buffer[..]).unwrap();
        assert_eq!(frame.dst_addr(), Address::new([0xDD; 6]));
        assert_eq!(frame.src_addr(), Address::new([0x0A; 6]));
        assert_eq!(frame.ether_type(), EtherType::ARP);
        assert_eq!(frame.payload(), &buffer[14 ..]);
    }

    #[test]
    fn test_set_fields() {
        let mut buffer = vec![0; Frame::<&[u8]>::buffer_len(2)];
        {
            let mut frame = Frame::try_new(&mut buffer[..]).unwrap();
            frame.set_dst_addr(Address::BROADCAST);
            frame.set_src_addr(Address::new([0x02, 0, 0, 0, 0, 0x01]));
            frame.set_ether_type(EtherType::ARP);
            frame.payload_mut().copy_from_slice(&[0xAB, 0xCD]);
        }
        assert_eq!(
            buffer,
            vec![
                0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x02, 0x00, 0x00, 0x00, 0x00, 0x01, 0x08,
                0x06, 0xAB, 0xCD,
            ]
        );
    }

    #[test]
    fn test_ether_type_display() {
        assert_eq!(EtherType::ARP.to_string(), "ARP");
        assert_eq!(EtherType(0x0800).to_string(), "0800");
        assert_eq!(EtherType(0x86DD).to_string(), "86dd");
    }

    #[test]
    fn test_frame_display() {
        let buffer = arp_frame_bytes();
        let frame = Frame::try_new(&buffer[..]).unwrap();
        assert_eq!(
            frame.to_string(),
            "src 0A:0A:0A:0A:0A:0A dest DD:DD:DD:DD:DD:DD type ARP payload size 4"
        );
    }

    #[test]
    fn test_address_from_str() {
        assert_eq!(
            "02:00:00:00:00:01".parse::<Address>(),
            Ok(Address::new([0x02, 0, 0, 0, 0, 0x01]))
        );
        assert_eq!("02:00:00:00:00".parse::<Address>(), Err(()));
        assert_eq!("02:00:00:00:00:01:02".parse::<Address>(), Err(()));
        assert_eq!("02:00:00:00:00:GG".parse::<Address>(), Err(()));
        assert_eq!("02::00:00:00:01".parse::<Address>(), Err(()));
    }

    #[test]
    fn test_is_broadcast() {
        assert!(Address::BROADCAST.is_broadcast());
        assert!(!Address::new([0x02, 0, 0, 0, 0, 0x01]).is_broadcast());
    }
}
