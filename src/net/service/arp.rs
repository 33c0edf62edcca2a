use crate::net::link::{
    Error as LinkError,
    LinkTx,
};
use crate::net::repr::{
    arp_hw_types,
    arp_proto_types,
    Arp,
    ArpFrame,
    ArpHwType,
    ArpOp,
    ArpProtoType,
    Error as DecodeError,
    EtherType,
    EthernetAddress,
    EthernetFrame,
    Ipv4Address,
};
use crate::net::service::{
    Handler,
    Result as ServiceResult,
};

#[derive(Debug)]
pub enum Error {
    /// Indicates a hardware type other than Ethernet.
    UnsupportedHardware(ArpHwType),
    /// Indicates a protocol type other than IPv4.
    UnsupportedProtocol(ArpProtoType),
    /// Indicates an operation other than a request.
    UnsupportedOperation(u16),
    /// Indicates Ethernet/IPv4 address lengths other than 6 and 4.
    AddressLength { hw_len: u8, proto_len: u8 },
    /// Indicates a packet whose address data could not be decoded.
    Decode(DecodeError),
    /// Indicates a reply that could not be sent.
    Link(LinkError),
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Error::Decode(err)
    }
}

impl From<LinkError> for Error {
    fn from(err: LinkError) -> Self {
        Error::Link(err)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::UnsupportedHardware(hw_type) => write!(f, "unsupported HW type: {}", hw_type),
            Error::UnsupportedProtocol(proto_type) => {
                write!(f, "unsupported protocol: {}", proto_type)
            }
            Error::UnsupportedOperation(op) => write!(f, "unsupported ARP operation: {}", op),
            Error::AddressLength { hw_len, proto_len } => write!(
                f,
                "unsupported address lengths: hw {} proto {}",
                hw_len, proto_len
            ),
            Error::Decode(ref err) => write!(f, "{}", err),
            Error::Link(ref err) => write!(f, "sending reply failed: {}", err),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// Answers ARP requests for a single Ethernet/IPv4 address pair.
///
/// Requests for other addresses are accepted and left unanswered. There is
/// no ARP cache, so nothing is learned from the packets seen.
pub struct Service<T: LinkTx> {
    link: T,
    ethernet_addr: EthernetAddress,
    ipv4_addr: Ipv4Address,
}

impl<T: LinkTx> Service<T> {
    /// Creates a service that replies over `link` on behalf of the given
    /// addresses.
    pub fn new(link: T, ethernet_addr: EthernetAddress, ipv4_addr: Ipv4Address) -> Service<T> {
        Service {
            link,
            ethernet_addr,
            ipv4_addr,
        }
    }

    /// Validates an ARP packet and replies to it if it is a request for the
    /// service's IPv4 address.
    pub fn handle(&mut self, arp_frame: &ArpFrame<&[u8]>) -> Result<()> {
        if arp_frame.hw_type() != arp_hw_types::ETHERNET {
            return Err(Error::UnsupportedHardware(arp_frame.hw_type()));
        }

        if arp_frame.proto_type() != arp_proto_types::IPV4 {
            return Err(Error::UnsupportedProtocol(arp_frame.proto_type()));
        }

        if arp_frame.op() != ArpOp::Request as u16 {
            return Err(Error::UnsupportedOperation(arp_frame.op()));
        }

        let binding = arp_frame
            .ipv4_binding()
            .ok_or(Error::Decode(DecodeError::OutOfBounds))?;

        if arp_frame.hw_len() != 6 || arp_frame.proto_len() != 4 {
            return Err(Error::AddressLength {
                hw_len: arp_frame.hw_len(),
                proto_len: arp_frame.proto_len(),
            });
        }

        let target_proto_addr = Ipv4Address::try_new(binding.target_proto_addr)?;
        if target_proto_addr != self.ipv4_addr {
            debug!(
                "Ignoring ARP request with target IPv4 address {}.",
                target_proto_addr
            );
            return Ok(());
        }

        let arp_reply = Arp::EthernetIpv4 {
            op: ArpOp::Reply,
            source_hw_addr: self.ethernet_addr,
            source_proto_addr: self.ipv4_addr,
            target_hw_addr: EthernetAddress::try_new(binding.sender_hw_addr)?,
            target_proto_addr: Ipv4Address::try_new(binding.sender_proto_addr)?,
        };

        self.reply(&arp_reply)
    }

    fn reply(&mut self, arp_reply: &Arp) -> Result<()> {
        let (target_hw_addr, target_proto_addr) = match *arp_reply {
            Arp::EthernetIpv4 {
                target_hw_addr,
                target_proto_addr,
                ..
            } => (target_hw_addr, target_proto_addr),
        };

        let mut eth_buffer = vec![0; EthernetFrame::<&[u8]>::buffer_len(arp_reply.buffer_len())];
        {
            let mut eth_frame = EthernetFrame::try_new(&mut eth_buffer[..])?;
            eth_frame.set_dst_addr(target_hw_addr);
            eth_frame.set_src_addr(self.ethernet_addr);
            eth_frame.set_ether_type(EtherType::ARP);
            arp_reply.serialize(eth_frame.payload_mut())?;
        }

        debug!(
            "Sending ARP reply to {}/{}.",
            target_proto_addr, target_hw_addr
        );

        self.link.send(&eth_buffer)?;
        Ok(())
    }
}

impl<T: LinkTx> Handler for Service<T> {
    fn recv(&mut self, payload: &[u8]) -> ServiceResult<()> {
        let arp_frame = ArpFrame::try_new(payload)?;
        info!("{}", arp_frame);
        self.handle(&arp_frame)?;
        Ok(())
    }
}
