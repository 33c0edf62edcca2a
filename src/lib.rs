//! Userspace frame ingestion for a Linux TAP interface.
//!
//! A TAP device is acquired and configured by `linux::dev`, frames read from
//! it are decoded by `net::repr` and routed by EtherType through a
//! `net::service::ethernet::Dispatcher`. ARP requests for the configured
//! address are answered.

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
extern crate byteorder;
extern crate crossbeam_channel;
extern crate libc;
#[macro_use]
extern crate log;

pub mod config;
pub mod net;

#[cfg(target_os = "linux")]
pub mod linux;
