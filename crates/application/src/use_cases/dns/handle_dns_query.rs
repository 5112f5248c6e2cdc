use crate::ports::UpstreamResolver;
use nat64_dns_domain::{DnsQuery, Nat64Synthesizer, SynthesizedRecord};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Answers the questions of one inbound query.
///
/// AAAA questions are resolved as A upstream and synthesized under the NAT64
/// prefix. Every other type is left unanswered without touching upstream.
/// Upstream failures are logged and produce no records; nothing here fails
/// the query as a whole.
pub struct HandleDnsQueryUseCase {
    resolver: Arc<dyn UpstreamResolver>,
    synthesizer: Nat64Synthesizer,
}

impl HandleDnsQueryUseCase {
    pub fn new(resolver: Arc<dyn UpstreamResolver>, synthesizer: Nat64Synthesizer) -> Self {
        Self {
            resolver,
            synthesizer,
        }
    }

    pub fn synthesizer(&self) -> &Nat64Synthesizer {
        &self.synthesizer
    }

    /// Questions are handled in order, one at a time.
    pub async fn execute(&self, questions: &[DnsQuery]) -> Vec<SynthesizedRecord> {
        let mut answers = Vec::new();
        for question in questions {
            if question.is_aaaa() {
                answers.extend(self.answer_aaaa(question).await);
            }
        }
        answers
    }

    async fn answer_aaaa(&self, question: &DnsQuery) -> Vec<SynthesizedRecord> {
        let start = Instant::now();
        debug!(domain = %question.name, "AAAA query");

        let addresses = match self.resolver.lookup_ipv4(&question.name).await {
            Ok(addresses) => addresses,
            Err(e) => {
                warn!(
                    domain = %question.name,
                    error = %e,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Resolve error"
                );
                return Vec::new();
            }
        };

        let mut records = Vec::with_capacity(addresses.len());
        for ipv4 in addresses {
            debug!(
                upstream = %self.resolver.upstream(),
                domain = %question.name,
                address = %ipv4,
                "A response"
            );
            if let Some(record) = self.synthesizer.synthesize(&question.name, ipv4) {
                debug!(domain = %question.name, address = %record.text, "AAAA synthesized");
                records.push(record);
            }
        }

        records
    }
}
