use super::RecordType;
use std::fmt;
use std::fmt::Write;
use std::sync::Arc;

/// Question name as the raw labels taken off the wire.
///
/// Labels are kept byte for byte so that a name can be sent upstream and
/// echoed back exactly as the client spelled it. The text form is for logs
/// only and is never parsed back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryName {
    labels: Arc<[Box<[u8]>]>,
    text: Arc<str>,
}

impl QueryName {
    pub fn from_labels<I, L>(labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let labels: Arc<[Box<[u8]>]> = labels
            .into_iter()
            .map(|label| Box::from(label.as_ref()))
            .collect();
        let text = presentation(&labels).into();
        Self { labels, text }
    }

    pub fn labels(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.labels.iter().map(|label| &label[..])
    }

    /// Absolute presentation form, `\DDD` escapes for bytes outside
    /// printable ASCII.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for QueryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn presentation(labels: &[Box<[u8]>]) -> String {
    if labels.is_empty() {
        return ".".to_string();
    }

    let mut text = String::new();
    for label in labels {
        for &byte in label.iter() {
            match byte {
                b'.' | b'\\' => {
                    text.push('\\');
                    text.push(byte as char);
                }
                0x21..=0x7E => text.push(byte as char),
                _ => {
                    let _ = write!(text, "\\{:03}", byte);
                }
            }
        }
        text.push('.');
    }
    text
}

/// A single question taken from an inbound query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub name: QueryName,
    pub record_type: RecordType,
}

impl DnsQuery {
    pub fn new(name: QueryName, record_type: RecordType) -> Self {
        Self { name, record_type }
    }

    pub fn is_aaaa(&self) -> bool {
        self.record_type == RecordType::AAAA
    }
}
