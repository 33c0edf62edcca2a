use std::collections::HashMap;

use crate::net::repr::{
    EtherType,
    EthernetFrame,
};
use crate::net::service::Handler;

/// Per frame outcome counters. Every frame fed to a `Dispatcher` is counted
/// in exactly one of them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Frames too short to hold an Ethernet header.
    pub malformed: usize,
    /// Frames accepted by their protocol handler.
    pub handled: usize,
    /// Frames rejected by their protocol handler.
    pub failed: usize,
    /// Frames with an EtherType that has no handler.
    pub ignored: usize,
}

/// Routes Ethernet frames to protocol handlers by EtherType.
pub struct Dispatcher {
    handlers: HashMap<EtherType, Box<dyn Handler>>,
    stats: Stats,
}

impl Dispatcher {
    pub fn new() -> Dispatcher {
        Dispatcher {
            handlers: HashMap::new(),
            stats: Stats::default(),
        }
    }

    /// Registers the handler for an EtherType, returning the handler it
    /// replaces if any.
    pub fn register(
        &mut self,
        ether_type: EtherType,
        handler: Box<dyn Handler>,
    ) -> Option<Box<dyn Handler>> {
        self.handlers.insert(ether_type, handler)
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Decodes a raw frame and dispatches it.
    ///
    /// Frames that fail to decode are logged and dropped without reaching
    /// `dispatch(...)`.
    pub fn recv(&mut self, eth_buffer: &[u8]) {
        match EthernetFrame::try_new(eth_buffer) {
            Ok(eth_frame) => self.dispatch(&eth_frame),
            Err(err) => {
                self.stats.malformed += 1;
                warn!(
                    "Dropping {} byte frame, Ethernet decode failed with {}.",
                    eth_buffer.len(),
                    err
                );
            }
        }
    }

    /// Forwards the payload of an Ethernet frame to the handler registered
    /// for its EtherType. Handler errors are logged, never returned.
    pub fn dispatch(&mut self, eth_frame: &EthernetFrame<&[u8]>) {
        debug!("Parsed Ethernet frame: {}.", eth_frame);

        let ether_type = eth_frame.ether_type();

        match self.handlers.get_mut(&ether_type) {
            Some(handler) => match handler.recv(eth_frame.payload()) {
                Ok(()) => self.stats.handled += 1,
                Err(err) => {
                    self.stats.failed += 1;
                    warn!("Dropping {} frame: {}.", ether_type, err);
                }
            },
            None => {
                self.stats.ignored += 1;
                info!("EtherType {} not implemented, ignoring.", ether_type);
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Dispatcher {
        Dispatcher::new()
    }
}
