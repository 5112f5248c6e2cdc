use clap::Parser;
use nat64_dns_domain::{CliOverrides, EmbeddingMode};
use nat64_dns_infrastructure::dns::DnsServerHandler;
use tracing::{info, warn};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "nat64-dns")]
#[command(version)]
#[command(about = "NAT64 DNS responder - answers AAAA queries with addresses synthesized from upstream A records")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Upstream nameserver, an IPv4 or IPv6 literal
    #[arg(short = 'n', long, value_name = "ADDR")]
    nameserver: Option<String>,

    /// NAT64 prefix
    #[arg(long = "nat64", value_name = "PREFIX")]
    nat64_prefix: Option<String>,

    /// Address embedding (textual, rfc6052)
    #[arg(long, value_name = "MODE")]
    embedding: Option<EmbeddingMode>,

    /// Log every question and synthesized answer
    #[arg(short = 'D', long)]
    debug: bool,

    /// DNS server port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Upper bound for one upstream exchange, in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        nameserver: cli.nameserver,
        query_timeout_ms: cli.timeout_ms,
        nat64_prefix: cli.nat64_prefix,
        embedding: cli.embedding,
        dns_port: cli.port,
        bind_address: cli.bind,
        log_level: cli.log_level,
        debug: cli.debug,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting NAT64 DNS v{}", env!("CARGO_PKG_VERSION"));

    let dns_services = di::DnsServices::new(&config)?;

    info!(nameserver = %dns_services.nameserver, "Upstream nameserver");
    info!(
        prefix = %config.nat64.prefix,
        embedding = %config.nat64.embedding,
        ttl = config.nat64.ttl,
        "NAT64 prefix"
    );

    if !dns_services.handler_use_case.synthesizer().probe() {
        warn!(
            prefix = %config.nat64.prefix,
            "NAT64 prefix cannot embed an IPv4 address, every AAAA answer will be empty"
        );
    }

    let dns_addr = config.server.listen_addr();
    let dns_handler = DnsServerHandler::new(dns_services.handler_use_case);

    tokio::select! {
        result = server::start_dns_server(dns_addr, dns_handler) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
