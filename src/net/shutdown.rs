//! A one-shot cancellation token shared between threads.

use std::io::{
    self,
    Write,
};
use std::os::unix::io::{
    AsRawFd,
    RawFd,
};
use std::os::unix::net::UnixStream;
use std::sync::atomic::{
    AtomicBool,
    Ordering,
};
use std::sync::Arc;
use std::time::Duration;

struct Inner {
    triggered: AtomicBool,
    // Written once on trigger. The byte is never read back, so the read end
    // stays readable for every poll(...) after the trigger.
    notify: UnixStream,
    wake: UnixStream,
}

/// Requests that long running loops stop.
///
/// Clones share the same state. Besides a flag, the token exposes a file
/// descriptor that becomes readable once triggered, so a thread blocked in
/// `poll(...)` on a device can be woken without waiting for traffic.
#[derive(Clone)]
pub struct Shutdown {
    inner: Arc<Inner>,
}

impl Shutdown {
    pub fn new() -> io::Result<Shutdown> {
        let (notify, wake) = UnixStream::pair()?;
        notify.set_nonblocking(true)?;

        Ok(Shutdown {
            inner: Arc::new(Inner {
                triggered: AtomicBool::new(false),
                notify,
                wake,
            }),
        })
    }

    /// Requests shutdown. Only the first call has an effect.
    pub fn trigger(&self) {
        if self.inner.triggered.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Err(err) = (&self.inner.notify).write_all(&[1]) {
            warn!("Failed to wake threads waiting on shutdown: {}.", err);
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.inner.triggered.load(Ordering::SeqCst)
    }

    /// Blocks until shutdown is requested.
    pub fn wait(&self) {
        while !self.wait_timeout(Duration::from_secs(60)) {}
    }

    /// Blocks until shutdown is requested or the timeout elapses. Returns
    /// true if shutdown was requested.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        if self.is_triggered() {
            return true;
        }

        let mut pollfd = libc::pollfd {
            fd: self.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let timeout_ms = timeout.as_millis().min(libc::c_int::max_value() as u128) as libc::c_int;

        if unsafe { libc::poll(&mut pollfd, 1, timeout_ms) } == -1 {
            debug!(
                "Shutdown::wait_timeout(...) poll failed with {}.",
                io::Error::last_os_error()
            );
        }

        self.is_triggered()
    }
}

impl AsRawFd for Shutdown {
    /// Returns a descriptor that polls readable once shutdown is requested.
    fn as_raw_fd(&self) -> RawFd {
        self.inner.wake.as_raw_fd()
    }
}
