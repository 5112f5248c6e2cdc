use nat64_dns_application::use_cases::HandleDnsQueryUseCase;
use nat64_dns_domain::{Config, NameserverAddr};
use nat64_dns_infrastructure::dns::ForwardingResolver;
use std::sync::Arc;
use tracing::debug;

pub struct DnsServices {
    pub nameserver: NameserverAddr,
    pub handler_use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let nameserver = config.upstream.dial_target()?;
        let synthesizer = config.nat64.synthesizer()?;

        debug!(
            nameserver = %nameserver,
            family = nameserver.family().as_str(),
            timeout_ms = config.upstream.query_timeout_ms,
            "Building forwarding resolver"
        );

        let resolver = Arc::new(ForwardingResolver::new(
            nameserver.clone(),
            config.upstream.query_timeout(),
        ));
        let handler_use_case = Arc::new(HandleDnsQueryUseCase::new(resolver, synthesizer));

        Ok(Self {
            nameserver,
            handler_use_case,
        })
    }
}
