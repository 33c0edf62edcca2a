//! Acquiring and configuring the TAP device.

use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use crate::config::DeviceConfig;
use crate::linux::ifreq::{
    IfReq,
    IFF_NO_PI,
    IFF_TAP,
    IFREQ_LEN,
    TUNSETIFF,
};
use crate::linux::ip::{
    Configure,
    IpCommand,
};
use crate::linux::tap::Tap;

/// A host configuration step, in the order they are applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    LinkUp,
    Route,
    Address,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Step::LinkUp => write!(f, "link up"),
            Step::Route => write!(f, "route"),
            Step::Address => write!(f, "address"),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    /// Indicates the device file was absent and could not be created.
    CreateFailed(io::Error),
    /// Indicates the device file could not be opened.
    OpenFailed(io::Error),
    /// Indicates the kernel refused to attach a TAP interface.
    BindFailed(io::Error),
    /// Indicates a host configuration step failed.
    ConfigureFailed(Step, io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::CreateFailed(ref err) => write!(f, "creating device file: {}", err),
            Error::OpenFailed(ref err) => write!(f, "opening device file: {}", err),
            Error::BindFailed(ref err) => write!(f, "TUNSETIFF: {}", err),
            Error::ConfigureFailed(step, ref err) => write!(f, "configuring {}: {}", step, err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::CreateFailed(ref err)
            | Error::OpenFailed(ref err)
            | Error::BindFailed(ref err)
            | Error::ConfigureFailed(_, ref err) => Some(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Creates, opens, binds and configures a TAP interface.
///
/// The returned `Tap` is the only owner of the descriptor. On any failure
/// after the device was opened, the descriptor is closed before returning.
pub fn acquire(config: &DeviceConfig, configurator: &mut dyn Configure) -> Result<Tap> {
    if !config.path.exists() {
        create(&config.path, config.major, config.minor).map_err(Error::CreateFailed)?;
        info!(
            "Created device file {} ({}:{}).",
            config.path.display(),
            config.major,
            config.minor
        );
    }

    let fd = open(&config.path).map_err(Error::OpenFailed)?;
    let mut tap = Tap::from_raw_fd(fd, config.local_addr);

    let flags = IFF_TAP | IFF_NO_PI;
    let ifreq = match config.ifname {
        Some(ref ifname) => IfReq::with_name(ifname, flags).ok_or_else(|| {
            Error::BindFailed(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid interface name {:?}", ifname),
            ))
        })?,
        None => IfReq::with_flags(flags),
    };

    let ifreq = bind(fd, &ifreq).map_err(Error::BindFailed)?;
    tap.set_ifname(ifreq.name());

    configure(tap.ifname(), config, configurator)?;

    info!("TAP interface {} is up with {}.", tap.ifname(), tap.addr());

    Ok(tap)
}

/// Applies the host configuration steps in order, stopping at the first
/// failure.
pub fn configure(
    ifname: &str,
    config: &DeviceConfig,
    configurator: &mut dyn Configure,
) -> Result<()> {
    let commands = [
        (Step::LinkUp, IpCommand::SetLinkUp(ifname)),
        (Step::Route, IpCommand::AddRoute(ifname, config.route)),
        (Step::Address, IpCommand::AddAddress(ifname, config.local_addr)),
    ];

    for &(step, ref command) in commands.iter() {
        configurator
            .execute(command)
            .map_err(|err| Error::ConfigureFailed(step, err))?;
    }

    Ok(())
}

fn c_path(path: &Path) -> io::Result<CString> {
    CString::new(path.as_os_str().as_bytes())
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))
}

fn create(path: &Path, major: u32, minor: u32) -> io::Result<()> {
    let c_path = c_path(path)?;
    let mode = libc::S_IFCHR | 0o600;

    if unsafe { libc::mknod(c_path.as_ptr(), mode, libc::makedev(major, minor)) } == -1 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}

fn open(path: &Path) -> io::Result<libc::c_int> {
    let c_path = c_path(path)?;
    let fd = unsafe { libc::open(c_path.as_ptr(), libc::O_RDWR | libc::O_CLOEXEC) };

    if fd == -1 {
        return Err(io::Error::last_os_error());
    }

    Ok(fd)
}

fn bind(fd: libc::c_int, ifreq: &IfReq) -> io::Result<IfReq> {
    let mut buffer: [u8; IFREQ_LEN] = ifreq.to_bytes();

    if unsafe { libc::ioctl(fd, TUNSETIFF as _, buffer.as_mut_ptr()) } == -1 {
        return Err(io::Error::last_os_error());
    }

    Ok(IfReq::from_bytes(&buffer))
}
