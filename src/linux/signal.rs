//! Converts termination signals into a shutdown request.
//!
//! Signals are blocked on the calling thread before any other thread is
//! spawned, so every thread inherits the mask and only the waiter thread
//! ever receives them.

use std::io;
use std::mem::MaybeUninit;
use std::thread;

use crate::net::shutdown::Shutdown;

/// A set of signals blocked for the whole process.
#[derive(Clone, Copy)]
pub struct SignalSet {
    set: libc::sigset_t,
}

impl SignalSet {
    /// Blocks `signals` on the calling thread and returns the set.
    pub fn block(signals: &[libc::c_int]) -> io::Result<SignalSet> {
        let mut set = MaybeUninit::<libc::sigset_t>::uninit();

        let set = unsafe {
            if libc::sigemptyset(set.as_mut_ptr()) == -1 {
                return Err(io::Error::last_os_error());
            }
            let mut set = set.assume_init();
            for &signal in signals {
                if libc::sigaddset(&mut set, signal) == -1 {
                    return Err(io::Error::last_os_error());
                }
            }
            set
        };

        let ret = unsafe { libc::pthread_sigmask(libc::SIG_BLOCK, &set, std::ptr::null_mut()) };
        if ret != 0 {
            return Err(io::Error::from_raw_os_error(ret));
        }

        Ok(SignalSet { set })
    }

    /// Blocks until one of the signals in the set is pending and returns it.
    pub fn wait(&self) -> io::Result<libc::c_int> {
        let mut signal: libc::c_int = 0;

        let ret = unsafe { libc::sigwait(&self.set, &mut signal) };
        if ret != 0 {
            return Err(io::Error::from_raw_os_error(ret));
        }

        Ok(signal)
    }
}

/// Spawns a thread that triggers `shutdown` on the first signal in `set`.
pub fn spawn_shutdown_waiter(
    set: SignalSet,
    shutdown: Shutdown,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("signal".to_string())
        .spawn(move || {
            match set.wait() {
                Ok(signal) => info!("Received signal {}, shutting down.", signal),
                Err(err) => error!("Waiting for signals: {}, shutting down.", err),
            }
            shutdown.trigger();
        })
}
