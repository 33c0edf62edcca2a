//! Linux TAP device support.

pub mod dev;
pub mod ifreq;
pub mod ip;
pub mod signal;
pub mod tap;

pub use self::tap::{
    Tap,
    TapWriter,
};
