//! Structured and SQL queries over business records
//!
//! [`QueryOptions`] describes an equality-filter query; [`QueryResult`] is the
//! shared result shape of structured, auxiliary and SQL queries.

pub mod options;
pub mod result;

pub use options::QueryOptions;
pub use result::QueryResult;
