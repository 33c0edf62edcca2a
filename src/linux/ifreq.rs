//! The `TUNSETIFF` request, serialized by hand.
//!
//! The kernel reads a `struct ifreq`: a NUL padded interface name, a union
//! whose first member for this request is a 16 bit flags field, and padding
//! up to the size of the union. Rather than casting a Rust struct and relying
//! on its layout, the request is written into a byte buffer field by field.

use std::ops::Range;

pub const IFF_TAP: u16 = 0x0002;

pub const IFF_NO_PI: u16 = 0x1000;

pub const TUNSETIFF: u64 = 0x4004_54CA;

/// Size of the interface name buffer, NUL terminator included.
pub const IFNAMSIZ: usize = 16;

/// Size of `struct ifreq` on Linux.
pub const IFREQ_LEN: usize = 40;

const NAME: Range<usize> = 0 .. IFNAMSIZ;

const FLAGS: Range<usize> = IFNAMSIZ .. IFNAMSIZ + 2;

const _: () = assert!(FLAGS.end <= IFREQ_LEN);

/// [https://linux.die.net/man/7/netdevice](https://linux.die.net/man/7/netdevice)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IfReq {
    name: [u8; IFNAMSIZ],
    flags: u16,
}

impl IfReq {
    /// Creates a request with an empty name, letting the kernel pick one.
    pub fn with_flags(flags: u16) -> IfReq {
        IfReq {
            name: [0; IFNAMSIZ],
            flags,
        }
    }

    /// Creates a request for a named interface. Returns `None` if the name
    /// does not fit with its NUL terminator.
    pub fn with_name(name: &str, flags: u16) -> Option<IfReq> {
        if name.len() >= IFNAMSIZ || name.as_bytes().contains(&0) {
            return None;
        }

        let mut ifreq = IfReq::with_flags(flags);
        ifreq.name[.. name.len()].copy_from_slice(name.as_bytes());
        Some(ifreq)
    }

    /// Reads back a request the kernel filled in.
    pub fn from_bytes(buffer: &[u8; IFREQ_LEN]) -> IfReq {
        let mut name = [0; IFNAMSIZ];
        name.copy_from_slice(&buffer[NAME]);

        let mut flags = [0; 2];
        flags.copy_from_slice(&buffer[FLAGS]);

        IfReq {
            name,
            flags: u16::from_ne_bytes(flags),
        }
    }

    /// Writes the request in the layout the kernel expects. Flags are in host
    /// byte order.
    pub fn to_bytes(&self) -> [u8; IFREQ_LEN] {
        let mut buffer = [0; IFREQ_LEN];
        buffer[NAME].copy_from_slice(&self.name);
        buffer[FLAGS].copy_from_slice(&self.flags.to_ne_bytes());
        buffer
    }

    /// Returns the interface name, the bytes up to the first NUL.
    pub fn name(&self) -> String {
        let len = self
            .name
            .iter()
            .position(|&c| c == 0)
            .unwrap_or(IFNAMSIZ);
        String::from_utf8_lossy(&self.name[.. len]).into_owned()
    }
}
