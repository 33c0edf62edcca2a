use std::time::Duration;

use crossbeam_channel::Sender;

use crate::net::link::{
    LinkRx,
    Wake,
};
use crate::net::repr::EthernetFrame;
use crate::net::shutdown::Shutdown;

/// A raw frame read from a link, at most `EthernetFrame::MAX_FRAME_LEN`
/// bytes long.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFrame {
    buffer: Vec<u8>,
}

impl<'a> From<&'a [u8]> for RawFrame {
    fn from(buffer: &'a [u8]) -> RawFrame {
        RawFrame {
            buffer: buffer.to_vec(),
        }
    }
}

impl AsRef<[u8]> for RawFrame {
    fn as_ref(&self) -> &[u8] {
        &self.buffer
    }
}

/// Exponential delay between consecutive link errors.
#[derive(Clone, Debug)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    next: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Backoff {
        Backoff {
            initial,
            max,
            next: initial,
        }
    }

    /// Returns the delay to apply after an error and doubles the following
    /// one, up to the maximum.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = std::cmp::min(self.next * 2, self.max);
        delay
    }

    /// Restarts from the initial delay, typically after a success.
    pub fn reset(&mut self) {
        self.next = self.initial;
    }
}

/// Reads frames from a link and publishes them on `frames` until shutdown is
/// requested or the receiving end hangs up.
///
/// Dropping `frames` on return is what closes the channel. Frames are
/// published in the order they are read. Read errors are logged and retried
/// after a delay from `backoff`, never ending the loop.
pub fn receive_loop<R: LinkRx>(
    link: &mut R,
    frames: Sender<RawFrame>,
    shutdown: &Shutdown,
    mut backoff: Backoff,
) {
    let mut buffer = vec![0; EthernetFrame::<&[u8]>::MAX_FRAME_LEN];

    loop {
        match link.wait(shutdown) {
            Ok(Wake::Shutdown) => {
                info!("Shutdown requested, exiting receive loop.");
                return;
            }
            Ok(Wake::Readable) => {}
            Err(err) => {
                warn!("Waiting on device failed with {}.", err);
                if shutdown.wait_timeout(backoff.next_delay()) {
                    info!("Shutdown requested, exiting receive loop.");
                    return;
                }
                continue;
            }
        }

        match link.recv(&mut buffer) {
            Ok(0) => {}
            Ok(buffer_len) => {
                backoff.reset();
                debug!("Read {} bytes from device.", buffer_len);
                if frames.send(RawFrame::from(&buffer[.. buffer_len])).is_err() {
                    info!("Frame receiver hung up, exiting receive loop.");
                    return;
                }
            }
            Err(err) => {
                warn!("Failed to read from device: {}.", err);
                if shutdown.wait_timeout(backoff.next_delay()) {
                    info!("Shutdown requested, exiting receive loop.");
                    return;
                }
            }
        }
    }
}
