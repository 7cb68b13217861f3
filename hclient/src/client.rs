//! Public entry point

use std::sync::Arc;

use crate::api::{
    BizRecord, CredentialManager, MetadataClient, ObjectMeta, ObjectMetaDetail, QueryOptions,
    QueryResult, RecordClient, RequestDispatcher, TokenSource,
};
use crate::config::Config;
use crate::error::{HClientError, Result};

/// Client for business objects and records on the platform
///
/// One instance owns one credential, shared by every call made through it.
/// Cloning is cheap and clones share that credential.
#[derive(Clone)]
pub struct HClient {
    config: Arc<Config>,
    credentials: Arc<CredentialManager>,
    metadata: Arc<MetadataClient>,
    records: Arc<RecordClient>,
}

impl HClient {
    /// Build a client that authenticates against the platform identity endpoint
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let http = build_http_client(&config)?;
        let credentials = Arc::new(CredentialManager::from_config(http.clone(), &config));
        Ok(Self::assemble(config, http, credentials))
    }

    /// Build a client with a custom credential source
    pub fn with_token_source(config: Config, source: Arc<dyn TokenSource>) -> Result<Self> {
        config.validate()?;
        let http = build_http_client(&config)?;
        let credentials = Arc::new(CredentialManager::new(
            source,
            std::time::Duration::from_secs(config.refresh_skew_secs),
        ));
        Ok(Self::assemble(config, http, credentials))
    }

    fn assemble(
        config: Config,
        http: reqwest::Client,
        credentials: Arc<CredentialManager>,
    ) -> Self {
        let config = Arc::new(config);
        let dispatcher = Arc::new(RequestDispatcher::new(
            http,
            Arc::clone(&config),
            Arc::clone(&credentials),
        ));
        Self {
            metadata: Arc::new(MetadataClient::new(Arc::clone(&dispatcher))),
            records: Arc::new(RecordClient::new(dispatcher, config.page_size)),
            credentials,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The credential manager, for diagnostics and explicit invalidation
    pub fn credentials(&self) -> &Arc<CredentialManager> {
        &self.credentials
    }

    /// Default page size applied to queries without one
    pub fn page_size(&self) -> u32 {
        self.records.default_page_size()
    }

    /// List business object types
    pub async fn get_objects(&self) -> Result<Vec<ObjectMeta>> {
        self.metadata.get_objects().await
    }

    /// Describe a business object type and its fields
    pub async fn get_object_description(&self, meta_name: &str) -> Result<ObjectMetaDetail> {
        self.metadata.get_object_description(meta_name).await
    }

    /// Create a record, returning its new code
    pub async fn create_data(&self, meta_name: &str, record: BizRecord) -> Result<String> {
        self.records.create_data(meta_name, record).await
    }

    /// Update a record, returning its code
    pub async fn update_data(
        &self,
        meta_name: &str,
        code: &str,
        record: BizRecord,
    ) -> Result<String> {
        self.records.update_data(meta_name, code, record).await
    }

    /// Create up to 30 records, returning codes in input order
    pub async fn batch_create_data(
        &self,
        meta_name: &str,
        records: Vec<BizRecord>,
    ) -> Result<Vec<String>> {
        self.records.batch_create_data(meta_name, records).await
    }

    /// Update up to 30 records, each carrying its code
    pub async fn batch_update_data(
        &self,
        meta_name: &str,
        records: Vec<BizRecord>,
    ) -> Result<Vec<String>> {
        self.records.batch_update_data(meta_name, records).await
    }

    /// Delete a record, returning its code
    pub async fn delete_data(&self, meta_name: &str, code: &str) -> Result<String> {
        self.records.delete_data(meta_name, code).await
    }

    /// Fetch a record
    pub async fn get_data(&self, meta_name: &str, code: &str) -> Result<BizRecord> {
        self.records.get_data(meta_name, code).await
    }

    /// Query records with an equality filter
    pub async fn query_data(&self, meta_name: &str, options: &QueryOptions) -> Result<QueryResult> {
        self.records.query_data(meta_name, options).await
    }

    /// Query records with a raw SQL string (where/order by/limit/offset)
    pub async fn query_data_by_sql(&self, sql: &str) -> Result<QueryResult> {
        self.records.query_data_by_sql(sql).await
    }

    /// Query built-in or auxiliary object records
    pub async fn query_auxiliary_data(
        &self,
        meta_name: &str,
        options: &QueryOptions,
    ) -> Result<QueryResult> {
        self.records.query_auxiliary_data(meta_name, options).await
    }

    /// Transfer a record to a new owner
    ///
    /// `add_team` keeps the current owner as a follower;
    /// `dept_follow_new_owner` moves the record to the new owner's department.
    pub async fn transfer_owner(
        &self,
        meta_name: &str,
        code: &str,
        new_owner: &str,
        add_team: bool,
        dept_follow_new_owner: bool,
    ) -> Result<String> {
        self.records
            .transfer_owner(meta_name, code, new_owner, add_team, dept_follow_new_owner)
            .await
    }
}

fn build_http_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.request_timeout())
        .connect_timeout(config.connect_timeout())
        .user_agent(concat!("hclient/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| HClientError::Config(format!("failed to build HTTP client: {}", e)))
}
