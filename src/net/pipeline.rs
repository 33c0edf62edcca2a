//! Wires a receive loop to a dispatcher.
//!
//! The receive loop runs on its own thread and owns the link for as long as
//! it runs. The calling thread drains the channel into the dispatcher and,
//! once the channel closes, joins the receive thread to get the link back.
//! The link is therefore never read and closed concurrently.

use std::io;
use std::thread;
use std::time::Duration;

use crate::net::link::LinkRx;
use crate::net::service::ethernet::Dispatcher;
use crate::net::service::recv::{
    receive_loop,
    Backoff,
};
use crate::net::shutdown::Shutdown;

#[derive(Debug)]
pub enum Error {
    /// Indicates the receive thread could not be started.
    Spawn(io::Error),
    /// Indicates the receive thread panicked; the link was lost with it.
    Panicked,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::Spawn(ref err) => write!(f, "failed to spawn receive thread: {}", err),
            Error::Panicked => write!(f, "receive thread panicked"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// Tuning for `run(...)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Frames buffered between the receive loop and the dispatcher before the
    /// receive loop blocks.
    pub channel_capacity: usize,
    /// First delay after a link error.
    pub backoff_initial: Duration,
    /// Cap on the delay between consecutive link errors.
    pub backoff_max: Duration,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            channel_capacity: 64,
            backoff_initial: Duration::from_millis(1),
            backoff_max: Duration::from_secs(1),
        }
    }
}

/// Receives frames from `link` and dispatches them until shutdown is
/// requested, then returns the link so the caller can close it.
pub fn run<R>(
    link: R,
    dispatcher: &mut Dispatcher,
    shutdown: &Shutdown,
    options: &Options,
) -> Result<R>
where
    R: LinkRx + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded(options.channel_capacity);
    let backoff = Backoff::new(options.backoff_initial, options.backoff_max);
    let recv_shutdown = shutdown.clone();

    let receiver = thread::Builder::new()
        .name("receive".to_string())
        .spawn(move || {
            let mut link = link;
            receive_loop(&mut link, tx, &recv_shutdown, backoff);
            link
        })
        .map_err(Error::Spawn)?;

    let mut frames = 0;
    for raw_frame in rx.iter() {
        frames += 1;
        dispatcher.recv(raw_frame.as_ref());
    }

    info!("Receive channel closed after {} frames.", frames);

    receiver.join().map_err(|_| Error::Panicked)
}
