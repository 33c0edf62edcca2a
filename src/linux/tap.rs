use std::io;
use std::os::unix::io::AsRawFd;

use crate::net::link::{
    Error,
    LinkRx,
    LinkTx,
    Result,
    Wake,
};
use crate::net::repr::Ipv4AddressCidr;
use crate::net::shutdown::Shutdown;

/// [TAP interface](https://www.kernel.org/doc/Documentation/networking/tuntap.txt)
/// for receiving raw Ethernet frames.
///
/// Owns the device descriptor, which is closed exactly once when the `Tap`
/// is dropped. Use `linux::dev::acquire(...)` to create one.
#[derive(Debug)]
pub struct Tap {
    fd: libc::c_int,
    ifname: String,
    addr: Ipv4AddressCidr,
}

impl Tap {
    /// Takes ownership of an open descriptor.
    pub(crate) fn from_raw_fd(fd: libc::c_int, addr: Ipv4AddressCidr) -> Tap {
        Tap {
            fd,
            ifname: String::new(),
            addr,
        }
    }

    pub(crate) fn set_ifname(&mut self, ifname: String) {
        self.ifname = ifname;
    }

    /// Returns the interface name the kernel assigned.
    pub fn ifname(&self) -> &str {
        &self.ifname
    }

    /// Returns the address assigned to the host side of the interface.
    pub fn addr(&self) -> Ipv4AddressCidr {
        self.addr
    }

    /// Duplicates the descriptor for sending frames from another thread.
    pub fn writer(&self) -> Result<TapWriter> {
        let fd = unsafe { libc::fcntl(self.fd, libc::F_DUPFD_CLOEXEC, 0) };

        if fd == -1 {
            return Err(Error::IO(io::Error::last_os_error()));
        }

        Ok(TapWriter { fd })
    }

    /// Closes the device.
    pub fn close(self) {
        info!("Closing TAP interface {}.", self.ifname);
    }
}

impl LinkRx for Tap {
    fn wait(&mut self, shutdown: &Shutdown) -> Result<Wake> {
        let mut pollfds = [
            libc::pollfd {
                fd: shutdown.as_raw_fd(),
                events: libc::POLLIN,
                revents: 0,
            },
            libc::pollfd {
                fd: self.fd,
                events: libc::POLLIN,
                revents: 0,
            },
        ];

        loop {
            let ready = unsafe {
                libc::poll(
                    pollfds.as_mut_ptr(),
                    pollfds.len() as libc::nfds_t,
                    -1,
                )
            };

            if ready == -1 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(Error::IO(err));
            }

            if pollfds[0].revents != 0 || shutdown.is_triggered() {
                return Ok(Wake::Shutdown);
            }

            let revents = pollfds[1].revents;
            if revents & (libc::POLLERR | libc::POLLNVAL) != 0 {
                return Err(Error::Unknown("TAP descriptor in error state."));
            }
            if revents != 0 {
                return Ok(Wake::Readable);
            }
        }
    }

    fn recv(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let read = unsafe {
            libc::read(
                self.fd,
                buffer.as_mut_ptr() as *mut libc::c_void,
                buffer.len(),
            )
        };

        if read == -1 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::WouldBlock {
                return Ok(0);
            }
            return Err(Error::IO(err));
        }

        Ok(read as usize)
    }
}

impl AsRawFd for Tap {
    fn as_raw_fd(&self) -> libc::c_int {
        self.fd
    }
}

impl Drop for Tap {
    fn drop(&mut self) {
        if let Err(err) = close_fd(self.fd) {
            warn!("Failed to close TAP interface {}: {}.", self.ifname, err);
        }
    }
}

/// A duplicate of a `Tap` descriptor, used only for sending frames.
#[derive(Debug)]
pub struct TapWriter {
    fd: libc::c_int,
}

impl LinkTx for TapWriter {
    fn send(&mut self, buffer: &[u8]) -> Result<()> {
        let wrote = unsafe {
            libc::write(
                self.fd,
                buffer.as_ptr() as *const libc::c_void,
                buffer.len(),
            )
        };

        if wrote == -1 {
            return Err(Error::IO(io::Error::last_os_error()));
        }

        if wrote as usize != buffer.len() {
            return Err(Error::Unknown("Short write to TAP descriptor."));
        }

        Ok(())
    }
}

impl Drop for TapWriter {
    fn drop(&mut self) {
        if let Err(err) = close_fd(self.fd) {
            warn!("Failed to close TAP writer: {}.", err);
        }
    }
}

fn close_fd(fd: libc::c_int) -> io::Result<()> {
    if unsafe { libc::close(fd) } == -1 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}
