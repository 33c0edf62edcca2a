use std::fmt;
use std::io;
use std::process::Command;
use std::time::Instant;

use crate::net::repr::Ipv4AddressCidr;

/// A configuration step applied to the host side of a TAP interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IpCommand<'a> {
    /// `ip link set dev <ifname> up`
    SetLinkUp(&'a str),
    /// `ip route add dev <ifname> <cidr>`
    AddRoute(&'a str, Ipv4AddressCidr),
    /// `ip address add dev <ifname> local <cidr>`
    AddAddress(&'a str, Ipv4AddressCidr),
}

impl<'a> IpCommand<'a> {
    /// Returns the arguments to pass to `ip`.
    pub fn args(&self) -> Vec<String> {
        match *self {
            IpCommand::SetLinkUp(ifname) => ["link", "set", "dev", ifname, "up"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            IpCommand::AddRoute(ifname, cidr) => ["route", "add", "dev", ifname, cidr.to_string().as_str()]
                .iter()
                .map(ToString::to_string)
                .collect(),
            IpCommand::AddAddress(ifname, cidr) => {
                ["address", "add", "dev", ifname, "local", cidr.to_string().as_str()]
                    .iter()
                    .map(ToString::to_string)
                    .collect()
            }
        }
    }
}

impl<'a> fmt::Display for IpCommand<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ip {}", self.args().join(" "))
    }
}

/// Applies configuration steps to network interfaces.
pub trait Configure {
    fn execute(&mut self, command: &IpCommand) -> io::Result<()>;
}

/// Configures interfaces by running the `ip` command from iproute2.
#[derive(Clone, Debug)]
pub struct Ip {
    program: String,
}

impl Ip {
    pub fn new() -> Ip {
        Ip::with_program("ip")
    }

    /// Uses a different executable in place of `ip`.
    pub fn with_program(program: &str) -> Ip {
        Ip {
            program: program.to_string(),
        }
    }
}

impl Default for Ip {
    fn default() -> Ip {
        Ip::new()
    }
}

impl Configure for Ip {
    fn execute(&mut self, command: &IpCommand) -> io::Result<()> {
        let init_t = Instant::now();
        let output = Command::new(&self.program).args(command.args()).output()?;

        debug!(
            "Executed command {} in {} ms.",
            command,
            init_t.elapsed().as_millis()
        );

        if output.status.success() {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::Other,
                format!(
                    "`{}` failed with {}: {}",
                    command,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ))
        }
    }
}
