#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{Name, RecordType};
use nat64_dns_domain::{NameserverAddr, QueryName};
use nat64_dns_infrastructure::dns::ForwardingResolver;
use std::net::SocketAddr;
use std::time::Duration;

pub struct ResolverBuilder;

impl ResolverBuilder {
    pub fn pointed_at(addr: SocketAddr, timeout: Duration) -> ForwardingResolver {
        let target = NameserverAddr::new(&addr.ip().to_string(), addr.port()).unwrap();
        ForwardingResolver::new(target, timeout)
    }
}

/// Dotted name split into labels; no escapes.
pub fn query_name(text: &str) -> QueryName {
    QueryName::from_labels(text.trim_end_matches('.').split('.'))
}

/// Client-side queries as a stub resolver would send them.
pub struct QueryBuilder {
    message: Message,
}

impl QueryBuilder {
    pub fn new(id: u16) -> Self {
        let mut message = Message::new();
        message
            .set_id(id)
            .set_message_type(MessageType::Query)
            .set_op_code(OpCode::Query)
            .set_recursion_desired(true);
        Self { message }
    }

    pub fn question(mut self, name: &str, qtype: RecordType) -> Self {
        self.message
            .add_query(Query::query(Name::from_ascii(name).unwrap(), qtype));
        self
    }

    /// Question built from raw labels, for bytes a dotted name cannot spell.
    pub fn question_labels(mut self, labels: &[&[u8]], qtype: RecordType) -> Self {
        let name = Name::from_labels(labels.iter().copied()).unwrap();
        self.message.add_query(Query::query(name, qtype));
        self
    }

    pub fn op_code(mut self, op_code: OpCode) -> Self {
        self.message.set_op_code(op_code);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.message.to_vec().unwrap()
    }
}
