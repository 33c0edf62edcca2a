use std::fmt::{
    Display,
    Formatter,
    Result as FmtResult,
};
use std::ops::Deref;
use std::result::Result as StdResult;
use std::str::FromStr;

use crate::net::repr::{
    Error,
    Result,
};

/// [IPv4 address](https://en.wikipedia.org/wiki/IPv4) in network byte order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Address([u8; 4]);

impl Address {
    /// Creates an IPv4 address from a network byte order buffer.
    pub fn new(addr: [u8; 4]) -> Address {
        Address(addr)
    }

    /// Tries to create an IPv4 address from a network byte order slice.
    pub fn try_new(addr: &[u8]) -> Result<Address> {
        if addr.len() != 4 {
            return Err(Error::OutOfBounds);
        }

        let mut _addr: [u8; 4] = [0; 4];
        _addr.copy_from_slice(addr);
        Ok(Address(_addr))
    }

    /// Returns a reference to the network byte order representation of the
    /// address.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}.{}.{}.{}", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

impl FromStr for Address {
    type Err = ();

    /// Parses an IPv4 address from an A.B.C.D style string.
    fn from_str(addr: &str) -> StdResult<Address, Self::Err> {
        let mut ipv4: [u8; 4] = [0; 4];
        let mut tokens = addr.split('.');

        for byte in ipv4.iter_mut() {
            *byte = tokens.next().ok_or(())?.parse::<u8>().map_err(|_| ())?;
        }

        if tokens.next().is_some() {
            return Err(());
        }

        Ok(Address::new(ipv4))
    }
}

/// An IPv4 address paired with a subnet prefix length, in
/// [CIDR](https://en.wikipedia.org/wiki/Classless_Inter-Domain_Routing)
/// notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressCidr {
    address: Address,
    prefix_len: u8,
}

impl AddressCidr {
    /// Creates an address with a subnet prefix length.
    ///
    /// # Panics
    ///
    /// Causes a panic if the prefix length is greater than 32.
    pub fn new(address: Address, prefix_len: u8) -> AddressCidr {
        assert!(prefix_len <= 32);

        AddressCidr {
            address,
            prefix_len,
        }
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }
}

impl Deref for AddressCidr {
    type Target = Address;

    fn deref(&self) -> &Address {
        &self.address
    }
}

impl Display for AddressCidr {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}/{}", self.address, self.prefix_len)
    }
}

impl FromStr for AddressCidr {
    type Err = ();

    /// Parses an address from an A.B.C.D/N style string. A bare A.B.C.D is
    /// read as a /32.
    fn from_str(cidr: &str) -> StdResult<AddressCidr, Self::Err> {
        let mut tokens = cidr.splitn(2, '/');
        let address = tokens.next().ok_or(())?.parse::<Address>()?;
        let prefix_len = match tokens.next() {
            Some(prefix_len) => prefix_len.parse::<u8>().map_err(|_| ())?,
            None => 32,
        };

        if prefix_len > 32 {
            return Err(());
        }

        Ok(AddressCidr::new(address, prefix_len))
    }
}
