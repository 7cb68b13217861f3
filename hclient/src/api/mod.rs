//! Platform Web API module
//!
//! Layered leaves first: the credential manager owns the access token, the
//! dispatcher sends every call with it, and the metadata and record clients
//! build requests on top of the dispatcher.

pub mod auth;
pub mod constants;
pub mod dispatcher;
pub mod metadata;
pub mod models;
pub mod operations;
pub mod query;

pub use auth::{Credential, CredentialManager, CredentialState, IdentityClient, TokenSource};
pub use dispatcher::{ApiRequest, RequestDispatcher};
pub use metadata::{FieldMeta, FieldType, MetadataClient, ObjectMeta, ObjectMetaDetail, OptionValue};
pub use models::{BizRecord, FieldValue};
pub use operations::{Operation, RecordClient};
pub use query::{QueryOptions, QueryResult};
