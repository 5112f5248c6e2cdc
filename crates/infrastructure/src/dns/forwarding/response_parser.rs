use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::RData;
use nat64_dns_domain::DomainError;
use std::net::Ipv4Addr;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DnsResponse {
    /// A records of the answer section, in the order the upstream sent them.
    pub addresses: Vec<Ipv4Addr>,

    pub rcode: ResponseCode,

    pub truncated: bool,
}

impl DnsResponse {
    /// NOERROR yields the addresses (possibly none); every other rcode is
    /// an error.
    pub fn into_addresses(self) -> Result<Vec<Ipv4Addr>, DomainError> {
        match self.rcode {
            ResponseCode::NoError => Ok(self.addresses),
            ResponseCode::NXDomain => Err(DomainError::NxDomain),
            rcode => Err(DomainError::UpstreamRcode(ResponseParser::rcode_to_status(
                rcode,
            ))),
        }
    }
}

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<DnsResponse, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        if message.message_type() != MessageType::Response {
            return Err(DomainError::InvalidDnsResponse(
                "QR bit not set on upstream reply".to_string(),
            ));
        }

        let rcode = message.response_code();
        let truncated = message.truncated();

        // CNAME records are skipped; the upstream has already followed the chain.
        let addresses: Vec<Ipv4Addr> = message
            .answers()
            .iter()
            .filter_map(|record| match record.data() {
                RData::A(a) => Some(a.0),
                _ => None,
            })
            .collect();

        debug!(
            rcode = Self::rcode_to_status(rcode),
            addresses = addresses.len(),
            truncated = truncated,
            "DNS response parsed"
        );

        Ok(DnsResponse {
            addresses,
            rcode,
            truncated,
        })
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "UNKNOWN",
        }
    }
}
