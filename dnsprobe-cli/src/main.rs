use anyhow::Context;
use clap::{ArgAction, Parser};
use dnsprobe::dns::WireErrors;
use dnsprobe::dns::message::{QuerySpec, QueryType};
use dnsprobe::dns::name::build_ptr_query;
use dnsprobe::dns::resolver::transporter::{DEFAULT_PORT, resolve_server};
use dnsprobe::dns::resolver::{Resolver, ResolverConfig};
use dnsprobe::utils::hex_dump;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Exit status for an address that is not an IP literal in reverse mode.
const EXIT_INVALID_ADDRESS: u8 = 255;
const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Parser)]
#[command(name = "dnsprobe")]
#[command(version)]
#[command(about = "Send one DNS query over UDP and print the decoded response")]
struct Cli {
    /// Recursion desired
    #[arg(short = 'r')]
    recursion: bool,

    /// Reverse query, the address must be an IP address
    #[arg(short = 'x', conflicts_with = "ipv6")]
    reverse: bool,

    /// IPv6 (AAAA type) query
    #[arg(short = '6')]
    ipv6: bool,

    /// Server IP or domain name
    #[arg(short = 's', long, value_name = "SERVER")]
    server: String,

    /// Server port
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Receive timeout in seconds, 0 waits forever
    #[arg(long, value_name = "SECS", default_value_t = 3)]
    timeout: u64,

    /// Print the decoded message as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Do not print the hex dump of the response
    #[arg(long)]
    no_hex: bool,

    /// More logging (-v debug, -vv trace); RUST_LOG is used otherwise
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// Domain name to look up, or IP address with -x
    address: String,
}

impl Cli {
    fn query_spec(&self) -> Result<QuerySpec, WireErrors> {
        let (domain, record_type) = if self.reverse {
            (build_ptr_query(&self.address)?, QueryType::Ptr)
        } else if self.ipv6 {
            (self.address.clone(), QueryType::Aaaa)
        } else {
            (self.address.clone(), QueryType::A)
        };
        Ok(QuerySpec::new(domain, record_type, self.recursion))
    }

    fn timeout(&self) -> Option<Duration> {
        match self.timeout {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let spec = cli.query_spec()?;
    info!(domain = spec.domain(), record_type = ?spec.record_type(), "querying");

    let server = resolve_server(&cli.server, cli.port)
        .with_context(|| format!("cannot use DNS server {}", cli.server))?;
    let config = ResolverConfig::new(server).with_timeout(cli.timeout());
    debug!(?config, "resolver configuration");

    let mut resolver = Resolver::connect(&config)?;
    let exchange = resolver
        .query(&spec)
        .with_context(|| format!("query for {} failed", spec.domain()))?;

    if !cli.no_hex {
        println!("{}", hex_dump(&exchange.response));
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&exchange.message)?);
    } else {
        print!("{}", exchange.message);
    }
    Ok(())
}

fn exit_status(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<WireErrors>() {
        Some(WireErrors::InvalidAddress(_)) => EXIT_INVALID_ADDRESS,
        _ => EXIT_FAILURE,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_status(&e))
        }
    }
}
