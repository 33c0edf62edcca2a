//! Platform independent frame decoding and processing.

pub mod link;
pub mod pipeline;
pub mod repr;
pub mod service;
pub mod shutdown;
