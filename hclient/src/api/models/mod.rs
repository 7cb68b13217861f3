//! Record data model

pub mod record;
pub mod value;

pub use record::BizRecord;
pub use value::FieldValue;
