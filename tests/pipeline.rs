#[macro_use]
extern crate assert_matches;
#[macro_use]
extern crate lazy_static;
extern crate tapd;

mod context;

use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use tapd::net::pipeline::{
    self,
    Options,
};
use tapd::net::repr::{
    ArpFrame,
    EtherType,
    EthernetAddress,
    EthernetFrame,
    Ipv4Address,
};
use tapd::net::service::arp::{
    Error as ArpError,
    Service as ArpService,
};
use tapd::net::service::ethernet::{
    Dispatcher,
    Stats,
};
use tapd::net::shutdown::Shutdown;

use context::{
    Counter,
    MockLink,
    MockTx,
    ARP_REPLY,
    ARP_REQUEST,
    PEER_MAC,
    STACK_MAC,
    TRUNCATED,
};

fn arp_service(tx: &MockTx) -> ArpService<MockTx> {
    ArpService::new(
        tx.clone(),
        EthernetAddress::new(*STACK_MAC),
        Ipv4Address::new([10, 0, 0, 4]),
    )
}

fn arp_dispatcher(tx: &MockTx) -> Dispatcher {
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(EtherType::ARP, Box::new(arp_service(tx)));
    dispatcher
}

fn stats(handled: usize, failed: usize, ignored: usize, malformed: usize) -> Stats {
    Stats {
        malformed,
        handled,
        failed,
        ignored,
    }
}

#[test]
fn test_arp_request_is_handled() {
    let eth_frame = EthernetFrame::try_new(&ARP_REQUEST[..]).unwrap();
    assert_eq!(eth_frame.ether_type().to_string(), "ARP");
    assert_eq!(eth_frame.payload().len(), 28);
    let arp_frame = ArpFrame::try_new(eth_frame.payload()).unwrap();
    assert_matches!(
        arp_service(&MockTx::default()).handle(&arp_frame),
        Ok(())
    );

    let tx = MockTx::default();
    let mut dispatcher = arp_dispatcher(&tx);
    let shutdown = Shutdown::new().unwrap();

    let link = MockLink::script(&[&ARP_REQUEST[..]]);
    pipeline::run(link, &mut dispatcher, &shutdown, &Options::default()).unwrap();

    assert_eq!(dispatcher.stats(), stats(1, 0, 0, 0));
}

#[test]
fn test_arp_request_is_answered() {
    let tx = MockTx::default();
    let mut dispatcher = arp_dispatcher(&tx);
    let shutdown = Shutdown::new().unwrap();

    let link = MockLink::script(&[&ARP_REQUEST[..]]);
    pipeline::run(link, &mut dispatcher, &shutdown, &Options::default()).unwrap();

    let sent = tx.sent();
    assert_eq!(sent.len(), 1);

    let eth_frame = EthernetFrame::try_new(&sent[0][..]).unwrap();
    assert_eq!(eth_frame.dst_addr(), EthernetAddress::new(*PEER_MAC));
    assert_eq!(eth_frame.src_addr(), EthernetAddress::new(*STACK_MAC));
    assert_eq!(eth_frame.ether_type(), EtherType::ARP);

    let arp_frame = ArpFrame::try_new(eth_frame.payload()).unwrap();
    assert_eq!(arp_frame.op(), 2);
    let binding = arp_frame.ipv4_binding().unwrap();
    assert_eq!(binding.sender_hw_addr, &STACK_MAC[..]);
    assert_eq!(binding.sender_proto_addr, &[10, 0, 0, 4]);
    assert_eq!(binding.target_hw_addr, &PEER_MAC[..]);
    assert_eq!(binding.target_proto_addr, &[10, 0, 0, 5]);
}

#[test]
fn test_arp_reply_is_unsupported() {
    let eth_frame = EthernetFrame::try_new(&ARP_REPLY[..]).unwrap();
    let arp_frame = ArpFrame::try_new(eth_frame.payload()).unwrap();
    assert_matches!(
        arp_service(&MockTx::default()).handle(&arp_frame),
        Err(ArpError::UnsupportedOperation(2))
    );

    let tx = MockTx::default();
    let mut dispatcher = arp_dispatcher(&tx);
    let shutdown = Shutdown::new().unwrap();

    let link = MockLink::script(&[&ARP_REPLY[..]]);
    pipeline::run(link, &mut dispatcher, &shutdown, &Options::default()).unwrap();

    assert_eq!(dispatcher.stats(), stats(0, 1, 0, 0));
    assert!(tx.sent().is_empty());
}

#[test]
fn test_truncated_frame_is_never_dispatched() {
    let counter = Counter::default();
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(EtherType::ARP, Box::new(counter.clone()));
    dispatcher.register(EtherType(0xFFFF), Box::new(counter.clone()));
    let shutdown = Shutdown::new().unwrap();

    let link = MockLink::script(&[&TRUNCATED[..]]);
    pipeline::run(link, &mut dispatcher, &shutdown, &Options::default()).unwrap();

    assert_eq!(counter.count(), 0);
    assert_eq!(dispatcher.stats(), stats(0, 0, 0, 1));
}

#[test]
fn test_frames_are_dispatched_in_order() {
    let tx = MockTx::default();
    let mut dispatcher = arp_dispatcher(&tx);
    let shutdown = Shutdown::new().unwrap();

    let mut ipv4 = ARP_REQUEST.clone();
    ipv4[12 .. 14].copy_from_slice(&[0x08, 0x00]);

    let link = MockLink::script(&[
        &ARP_REQUEST[..],
        &TRUNCATED[..],
        &ipv4[..],
        &ARP_REPLY[..],
        &ARP_REQUEST[..],
    ]);
    pipeline::run(link, &mut dispatcher, &shutdown, &Options::default()).unwrap();

    assert_eq!(dispatcher.stats(), stats(2, 1, 1, 1));
    assert_eq!(tx.sent().len(), 2);
}

#[test]
fn test_cancellation_closes_link_once() {
    let mut dispatcher = arp_dispatcher(&MockTx::default());
    let shutdown = Shutdown::new().unwrap();

    let link = MockLink::idle();
    let closes = link.closes();

    let trigger = shutdown.clone();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        trigger.trigger();
    });

    let link = pipeline::run(link, &mut dispatcher, &shutdown, &Options::default()).unwrap();
    canceller.join().unwrap();

    assert_eq!(closes.load(Ordering::SeqCst), 0);
    drop(link);
    assert_eq!(closes.load(Ordering::SeqCst), 1);
    assert_eq!(dispatcher.stats(), Stats::default());
}

#[test]
fn test_cancellation_under_load() {
    let tx = MockTx::default();
    let mut dispatcher = arp_dispatcher(&tx);
    let shutdown = Shutdown::new().unwrap();

    let link = MockLink::endless(&ARP_REQUEST[..]);
    let closes = link.closes();

    let trigger = shutdown.clone();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        trigger.trigger();
    });

    let options = Options {
        channel_capacity: 4,
        ..Options::default()
    };
    let link = pipeline::run(link, &mut dispatcher, &shutdown, &options).unwrap();
    canceller.join().unwrap();

    drop(link);
    assert_eq!(closes.load(Ordering::SeqCst), 1);

    let stats = dispatcher.stats();
    assert!(stats.handled > 0);
    assert_eq!(stats.failed + stats.ignored + stats.malformed, 0);
    assert_eq!(tx.sent().len(), stats.handled);
}

#[test]
fn test_unstarted_links_close_once() {
    for link in vec![
        MockLink::script(&[&ARP_REQUEST[..]]),
        MockLink::idle(),
        MockLink::endless(&ARP_REQUEST[..]),
    ] {
        let closes = link.closes();
        drop(link);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }
}
