//! Business record operations
//!
//! [`Operation`] describes one record call and how it maps onto the wire;
//! [`RecordClient`] runs operations and queries through the dispatcher.

pub mod client;
pub mod operation;

pub use client::RecordClient;
pub use operation::Operation;

pub(crate) use operation::require_meta_name;
