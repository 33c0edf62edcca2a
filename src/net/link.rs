use crate::net::shutdown::Shutdown;

#[derive(Debug)]
pub enum Error {
    /// Indicates a generic IO error.
    IO(std::io::Error),
    /// Indicates a miscellaneous error with a message.
    Unknown(&'static str),
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::IO(error)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::IO(ref err) => write!(f, "link IO error: {}", err),
            Error::Unknown(msg) => write!(f, "link error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// Reason a `LinkRx::wait(...)` returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wake {
    /// The link has a frame ready to be read.
    Readable,
    /// Shutdown was requested.
    Shutdown,
}

/// The receive side of a link carrying raw Ethernet frames.
pub trait LinkRx {
    /// Blocks until the link has a frame to read or `shutdown` is triggered.
    /// A pending shutdown takes priority over a readable link.
    fn wait(&mut self, shutdown: &Shutdown) -> Result<Wake>;

    /// Reads a frame from the underlying device and returns the size of the
    /// frame. You should ensure that the buffer can hold a maximum size frame
    /// to avoid truncation.
    fn recv(&mut self, buffer: &mut [u8]) -> Result<usize>;
}

/// The transmit side of a link carrying raw Ethernet frames.
pub trait LinkTx {
    /// Sends a frame across the link.
    fn send(&mut self, buffer: &[u8]) -> Result<()>;
}
