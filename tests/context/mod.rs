use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};
use std::sync::{
    Arc,
    Mutex,
};

use tapd::net::link::{
    LinkRx,
    LinkTx,
    Result,
    Wake,
};
use tapd::net::service::{
    Handler,
    Result as ServiceResult,
};
use tapd::net::shutdown::Shutdown;

lazy_static! {
    /// MAC address the stack answers for.
    pub static ref STACK_MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];

    /// MAC address of the host asking.
    pub static ref PEER_MAC: [u8; 6] = [0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F];

    /// A broadcast ARP request from 10.0.0.5 for 10.0.0.4.
    pub static ref ARP_REQUEST: Vec<u8> = arp_frame(1, [10, 0, 0, 4]);

    /// The same frame carrying an ARP reply.
    pub static ref ARP_REPLY: Vec<u8> = arp_frame(2, [10, 0, 0, 4]);

    /// One byte short of an Ethernet header.
    pub static ref TRUNCATED: Vec<u8> = vec![0xFF; 13];
}

/// Builds a broadcast Ethernet frame carrying an Ethernet/IPv4 ARP packet
/// from the peer.
pub fn arp_frame(op: u16, target_proto_addr: [u8; 4]) -> Vec<u8> {
    let mut buffer = vec![0xFF; 6];
    buffer.extend_from_slice(&*PEER_MAC);
    buffer.extend_from_slice(&[0x08, 0x06]);
    buffer.extend_from_slice(&[0x00, 0x01, 0x08, 0x00, 6, 4]);
    buffer.extend_from_slice(&op.to_be_bytes());
    buffer.extend_from_slice(&*PEER_MAC);
    buffer.extend_from_slice(&[10, 0, 0, 5]);
    buffer.extend_from_slice(&[0; 6]);
    buffer.extend_from_slice(&target_proto_addr);
    buffer
}

/// A link replaying scripted frames.
///
/// Once the script runs out the link either requests shutdown itself or
/// blocks until someone else does. Drops are counted in `closes`.
pub struct MockLink {
    frames: VecDeque<Vec<u8>>,
    repeat: Option<Vec<u8>>,
    stop_when_drained: bool,
    closes: Arc<AtomicUsize>,
}

impl MockLink {
    /// Replays `frames` and then requests shutdown.
    pub fn script(frames: &[&[u8]]) -> MockLink {
        MockLink {
            frames: frames.iter().map(|frame| frame.to_vec()).collect(),
            repeat: None,
            stop_when_drained: true,
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Never produces a frame.
    pub fn idle() -> MockLink {
        let mut link = MockLink::script(&[]);
        link.stop_when_drained = false;
        link
    }

    /// Produces `frame` over and over.
    pub fn endless(frame: &[u8]) -> MockLink {
        let mut link = MockLink::idle();
        link.repeat = Some(frame.to_vec());
        link
    }

    pub fn closes(&self) -> Arc<AtomicUsize> {
        self.closes.clone()
    }
}

impl LinkRx for MockLink {
    fn wait(&mut self, shutdown: &Shutdown) -> Result<Wake> {
        if shutdown.is_triggered() {
            return Ok(Wake::Shutdown);
        }

        if !self.frames.is_empty() || self.repeat.is_some() {
            return Ok(Wake::Readable);
        }

        if self.stop_when_drained {
            shutdown.trigger();
        } else {
            shutdown.wait();
        }

        Ok(Wake::Shutdown)
    }

    fn recv(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let frame = match self.frames.pop_front() {
            Some(frame) => frame,
            None => match self.repeat {
                Some(ref frame) => frame.clone(),
                None => return Ok(0),
            },
        };

        buffer[.. frame.len()].copy_from_slice(&frame);
        Ok(frame.len())
    }
}

impl Drop for MockLink {
    fn drop(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// A link recording every frame sent over it.
#[derive(Clone, Default)]
pub struct MockTx {
    pub sent: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockTx {
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().unwrap().clone()
    }
}

impl LinkTx for MockTx {
    fn send(&mut self, buffer: &[u8]) -> Result<()> {
        self.sent.lock().unwrap().push(buffer.to_vec());
        Ok(())
    }
}

/// A handler counting the payloads it sees.
#[derive(Clone, Default)]
pub struct Counter {
    pub payloads: Rc<RefCell<usize>>,
}

impl Counter {
    pub fn count(&self) -> usize {
        *self.payloads.borrow()
    }
}

impl Handler for Counter {
    fn recv(&mut self, _: &[u8]) -> ServiceResult<()> {
        *self.payloads.borrow_mut() += 1;
        Ok(())
    }
}
