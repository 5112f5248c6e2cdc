use async_trait::async_trait;
use nat64_dns_domain::{DomainError, QueryName};
use std::net::Ipv4Addr;

/// Resolves A records through a single, fixed upstream nameserver.
///
/// An empty vector means the name exists but has no A records; every
/// failure (timeout, refusal, malformed reply, NXDOMAIN) is an error.
#[async_trait]
pub trait UpstreamResolver: Send + Sync {
    async fn lookup_ipv4(&self, name: &QueryName) -> Result<Vec<Ipv4Addr>, DomainError>;

    /// Dial target, for logging.
    fn upstream(&self) -> String;
}
