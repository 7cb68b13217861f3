//! Async client for business objects and records on a low-code CRM platform
//!
//! ```no_run
//! use hclient::{BizRecord, Config, HClient, QueryOptions};
//!
//! # async fn run() -> hclient::Result<()> {
//! let client = HClient::new(Config::new("https://open.example.com", "app-id", "app-secret"))?;
//!
//! let code = client
//!     .create_data("lead", BizRecord::new().with("name", "Acme").with("status", "open"))
//!     .await?;
//! let lead = client.get_data("lead", &code).await?;
//!
//! let open = client
//!     .query_data("lead", &QueryOptions::new().filter("status", "open"))
//!     .await?;
//! # let _ = (lead, open);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;

pub use api::{
    BizRecord, Credential, CredentialManager, CredentialState, FieldMeta, FieldType, FieldValue,
    ObjectMeta, ObjectMetaDetail, QueryOptions, QueryResult, TokenSource,
};
pub use client::HClient;
pub use config::Config;
pub use error::{HClientError, Result};
