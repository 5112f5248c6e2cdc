use super::forwarding::{MessageBuilder, ResponseParser};
use super::transport::UdpTransport;
use async_trait::async_trait;
use nat64_dns_application::ports::UpstreamResolver;
use nat64_dns_domain::{DomainError, NameserverAddr, QueryName, RecordType};
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};
use tracing::debug;

/// Resolves A records against one fixed nameserver.
///
/// The system resolver configuration is never read. Each lookup is a single
/// UDP exchange with no cache and no retry.
pub struct ForwardingResolver {
    target: NameserverAddr,
    transport: UdpTransport,
    timeout: Duration,
}

impl ForwardingResolver {
    pub fn new(target: NameserverAddr, timeout: Duration) -> Self {
        let transport = UdpTransport::new(target.socket_addr());
        Self {
            target,
            transport,
            timeout,
        }
    }

    pub fn target(&self) -> &NameserverAddr {
        &self.target
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl UpstreamResolver for ForwardingResolver {
    async fn lookup_ipv4(&self, name: &QueryName) -> Result<Vec<Ipv4Addr>, DomainError> {
        let start = Instant::now();
        let query_bytes = MessageBuilder::build_query(name, RecordType::A)?;

        let response_bytes = self.transport.send(&query_bytes, self.timeout).await?;
        let response = ResponseParser::parse(&response_bytes)?;

        if response.truncated {
            debug!(server = %self.target, domain = %name, "Upstream reply truncated, using partial answer");
        }

        debug!(
            server = %self.target,
            domain = %name,
            rcode = ResponseParser::rcode_to_status(response.rcode),
            addresses = response.addresses.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Upstream exchange complete"
        );

        response.into_addresses()
    }

    fn upstream(&self) -> String {
        self.target.to_string()
    }
}
