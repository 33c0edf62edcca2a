extern crate clap;
extern crate env_logger;
extern crate libc;
#[macro_use]
extern crate log;
extern crate tapd;

mod cli;

use std::error::Error;
use std::process;

use tapd::config::Config;
use tapd::linux::dev;
use tapd::linux::ip::Ip;
use tapd::linux::signal::{
    self,
    SignalSet,
};
use tapd::net::pipeline;
use tapd::net::repr::EtherType;
use tapd::net::service::arp;
use tapd::net::service::ethernet::Dispatcher;
use tapd::net::shutdown::Shutdown;

/// Acquires a TAP interface and processes frames from it until SIGINT or
/// SIGTERM.
fn main() {
    env_logger::init();

    let matches = cli::app().get_matches();
    let config = match cli::config(&matches) {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid configuration: {}.", err);
            process::exit(1);
        }
    };

    if let Err(err) = run(&config) {
        error!("{}.", err);
        process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    // Before any thread is spawned, so all of them inherit the mask.
    let signals = SignalSet::block(&[libc::SIGINT, libc::SIGTERM])?;
    let shutdown = Shutdown::new()?;
    signal::spawn_shutdown_waiter(signals, shutdown.clone())?;

    let tap = dev::acquire(&config.device, &mut Ip::new())?;

    let mut dispatcher = Dispatcher::new();
    dispatcher.register(
        EtherType::ARP,
        Box::new(arp::Service::new(
            tap.writer()?,
            config.stack.ethernet_addr,
            config.stack.ipv4_addr,
        )),
    );

    info!(
        "Answering ARP for {} at {} on {}.",
        config.stack.ipv4_addr,
        config.stack.ethernet_addr,
        tap.ifname()
    );

    let tap = pipeline::run(tap, &mut dispatcher, &shutdown, &config.pipeline)?;

    let stats = dispatcher.stats();
    info!(
        "Processed frames: {} handled, {} failed, {} ignored, {} malformed.",
        stats.handled, stats.failed, stats.ignored, stats.malformed
    );

    tap.close();

    Ok(())
}
