use super::forwarding::RecordTypeMapper;
use super::wire_response::{self, HEADER_LEN};
use hickory_proto::op::{Message, OpCode};
use nat64_dns_application::use_cases::HandleDnsQueryUseCase;
use nat64_dns_domain::{DnsQuery, QueryName};
use std::sync::Arc;
use tracing::{debug, error};

const FLAG_QR: u8 = 0x80;

/// Turns one inbound datagram into the bytes to send back, if any.
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }

    /// `None` means the datagram gets no reply: it is shorter than a DNS
    /// header, it is itself a response, or the reply could not be encoded.
    pub async fn handle_raw_udp(&self, query_buf: &[u8]) -> Option<Vec<u8>> {
        if query_buf.len() < HEADER_LEN {
            debug!(len = query_buf.len(), "Dropping datagram shorter than a DNS header");
            return None;
        }
        if query_buf[2] & FLAG_QR != 0 {
            debug!("Dropping datagram with QR set");
            return None;
        }

        let message = match Message::from_vec(query_buf) {
            Ok(message) => message,
            Err(e) => {
                debug!(error = %e, "Malformed query, replying FORMERR");
                return wire_response::build_format_error(query_buf);
            }
        };

        let questions = if message.op_code() == OpCode::Query {
            Self::dispatchable_questions(&message)
        } else {
            debug!(opcode = ?message.op_code(), "Unsupported opcode, replying empty");
            Vec::new()
        };

        let answers = self.use_case.execute(&questions).await;

        match wire_response::build_reply(&message, &answers) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!(id = message.id(), error = %e, "Failed to encode reply");
                None
            }
        }
    }

    /// Every question goes to the dispatcher with its labels untouched; it
    /// only acts on AAAA.
    fn dispatchable_questions(message: &Message) -> Vec<DnsQuery> {
        message
            .queries()
            .iter()
            .map(|query| {
                DnsQuery::new(
                    QueryName::from_labels(query.name().iter()),
                    RecordTypeMapper::from_hickory(query.query_type()),
                )
            })
            .collect()
    }
}
