//! Reply encoding.
//!
//! Replies are written directly in wire format. Names are emitted label by
//! label with no compression pointers, keeping the case the client sent.

use hickory_proto::op::Message;
use nat64_dns_domain::{DomainError, SynthesizedRecord};

pub const HEADER_LEN: usize = 12;

const FLAG_QR: u8 = 0x80;
const FLAG_RD: u8 = 0x01;
const FLAG_CD: u8 = 0x10;
const OPCODE_MASK: u8 = 0x78;
const RCODE_FORMERR: u8 = 0x01;

const TYPE_AAAA: u16 = 28;
const CLASS_IN: u16 = 1;
const AAAA_RDLENGTH: u16 = 16;

/// Builds the reply to a parsed query: id, opcode, RD, CD and every question
/// mirrored, QR set, RCODE NOERROR, `answers` in the answer section.
pub fn build_reply(query: &Message, answers: &[SynthesizedRecord]) -> Result<Vec<u8>, DomainError> {
    let ancount = u16::try_from(answers.len())
        .map_err(|_| DomainError::InvalidDnsResponse("Too many answers".to_string()))?;
    let qdcount = u16::try_from(query.queries().len())
        .map_err(|_| DomainError::InvalidDnsResponse("Too many questions".to_string()))?;

    let mut flags_hi = FLAG_QR | ((u8::from(query.op_code()) << 3) & OPCODE_MASK);
    if query.recursion_desired() {
        flags_hi |= FLAG_RD;
    }
    let flags_lo = if query.checking_disabled() { FLAG_CD } else { 0 };

    let mut buf = Vec::with_capacity(512);
    write_header(&mut buf, query.id(), flags_hi, flags_lo, qdcount, ancount);

    for question in query.queries() {
        write_name(&mut buf, question.name().iter());
        buf.extend_from_slice(&u16::from(question.query_type()).to_be_bytes());
        buf.extend_from_slice(&u16::from(question.query_class()).to_be_bytes());
    }

    for record in answers {
        write_name(&mut buf, record.name.labels());
        buf.extend_from_slice(&TYPE_AAAA.to_be_bytes());
        buf.extend_from_slice(&CLASS_IN.to_be_bytes());
        buf.extend_from_slice(&record.ttl.to_be_bytes());
        buf.extend_from_slice(&AAAA_RDLENGTH.to_be_bytes());
        buf.extend_from_slice(&record.address.octets());
    }

    Ok(buf)
}

/// FORMERR for a datagram whose header is intact but whose body is not.
/// Returns `None` when there is no full header to echo.
pub fn build_format_error(query_buf: &[u8]) -> Option<Vec<u8>> {
    if query_buf.len() < HEADER_LEN {
        return None;
    }

    let id = u16::from_be_bytes([query_buf[0], query_buf[1]]);
    let flags_hi = FLAG_QR | (query_buf[2] & (OPCODE_MASK | FLAG_RD));
    let flags_lo = (query_buf[3] & FLAG_CD) | RCODE_FORMERR;

    let mut buf = Vec::with_capacity(HEADER_LEN);
    write_header(&mut buf, id, flags_hi, flags_lo, 0, 0);
    Some(buf)
}

fn write_header(buf: &mut Vec<u8>, id: u16, flags_hi: u8, flags_lo: u8, qdcount: u16, ancount: u16) {
    buf.extend_from_slice(&id.to_be_bytes());
    buf.push(flags_hi);
    buf.push(flags_lo);
    buf.extend_from_slice(&qdcount.to_be_bytes());
    buf.extend_from_slice(&ancount.to_be_bytes());
    // NSCOUNT, ARCOUNT
    buf.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
}

fn write_name<'a>(buf: &mut Vec<u8>, labels: impl IntoIterator<Item = &'a [u8]>) {
    for label in labels {
        buf.push(label.len() as u8);
        buf.extend_from_slice(label);
    }
    buf.push(0x00);
}
