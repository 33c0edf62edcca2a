use tapd::config::{
    self,
    Config,
};

pub fn app<'a, 'b>() -> clap::App<'a, 'b> {
    clap::App::new("tapd")
        .about("Reads Ethernet frames from a TAP interface and answers ARP requests")
        .arg(
            clap::Arg::with_name("dev-path")
                .long("dev-path")
                .value_name("PATH")
                .help("TUN/TAP clone device, created if absent")
                .default_value("/dev/net/tap")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name("dev-major")
                .long("dev-major")
                .value_name("MAJOR")
                .help("Major number used when creating the clone device")
                .default_value("10")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name("dev-minor")
                .long("dev-minor")
                .value_name("MINOR")
                .help("Minor number used when creating the clone device")
                .default_value("200")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name("tap")
                .long("tap")
                .value_name("TAP")
                .help("Linux TAP interface name, picked by the kernel if omitted")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name("route")
                .long("route")
                .value_name("CIDR")
                .help("Route added through the TAP interface")
                .default_value("10.0.0.0/24")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name("local-ipv4")
                .long("local-ipv4")
                .value_name("CIDR")
                .help("IPv4 address of the host side of the TAP interface")
                .default_value("10.0.0.5/32")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name("stack-mac")
                .long("stack-mac")
                .value_name("MAC")
                .help("MAC address answered for")
                .default_value("02:00:00:00:00:01")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name("stack-ipv4")
                .long("stack-ipv4")
                .value_name("IPV4")
                .help("IPv4 address answered for")
                .default_value("10.0.0.4")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name("channel-capacity")
                .long("channel-capacity")
                .value_name("FRAMES")
                .help("Frames buffered between the reader and the dispatcher")
                .default_value("64")
                .takes_value(true),
        )
}

fn value<'a>(matches: &'a clap::ArgMatches, name: &'static str) -> config::Result<&'a str> {
    matches.value_of(name).ok_or(config::Error::Missing(name))
}

/// Builds a `Config` from parsed command line arguments.
pub fn config(matches: &clap::ArgMatches) -> config::Result<Config> {
    let mut config = Config::default();

    config.device.path = value(matches, "dev-path")?.into();
    config.device.major = config::parse("dev-major", value(matches, "dev-major")?)?;
    config.device.minor = config::parse("dev-minor", value(matches, "dev-minor")?)?;
    config.device.ifname = matches.value_of("tap").map(String::from);
    config.device.route = config::parse("route", value(matches, "route")?)?;
    config.device.local_addr = config::parse("local-ipv4", value(matches, "local-ipv4")?)?;

    config.stack.ethernet_addr = config::parse("stack-mac", value(matches, "stack-mac")?)?;
    config.stack.ipv4_addr = config::parse("stack-ipv4", value(matches, "stack-ipv4")?)?;

    config.pipeline.channel_capacity =
        config::parse("channel-capacity", value(matches, "channel-capacity")?)?;
    if config.pipeline.channel_capacity == 0 {
        return Err(config::Error::Invalid("channel-capacity", "0".to_string()));
    }

    Ok(config)
}
