mod record;
mod record_type;

pub use record::SynthesizedRecord;
pub use record_type::RecordType;
