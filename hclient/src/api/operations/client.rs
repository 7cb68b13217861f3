//! Record client: CRUD, batches, queries and ownership transfer

use log::debug;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::operation::{Operation, require_meta_name};
use crate::api::constants::paths;
use crate::api::dispatcher::{ApiRequest, RequestDispatcher};
use crate::api::models::BizRecord;
use crate::api::query::{QueryOptions, QueryResult};
use crate::error::{HClientError, Result};

#[derive(Debug, Deserialize)]
struct CodeResponse {
    code: String,
}

#[derive(Debug, Deserialize)]
struct CodesResponse {
    codes: Vec<String>,
}

/// Reads and writes business records through the dispatcher
pub struct RecordClient {
    dispatcher: Arc<RequestDispatcher>,
    default_page_size: u32,
}

impl RecordClient {
    pub fn new(dispatcher: Arc<RequestDispatcher>, default_page_size: u32) -> Self {
        Self {
            dispatcher,
            default_page_size,
        }
    }

    pub fn default_page_size(&self) -> u32 {
        self.default_page_size
    }

    pub async fn create_data(&self, meta_name: &str, record: BizRecord) -> Result<String> {
        self.execute_for_code(Operation::create(meta_name, record)).await
    }

    pub async fn update_data(
        &self,
        meta_name: &str,
        code: &str,
        record: BizRecord,
    ) -> Result<String> {
        self.execute_for_code(Operation::update(meta_name, code, record)).await
    }

    /// Create 1 to 30 records; codes come back in input order
    pub async fn batch_create_data(
        &self,
        meta_name: &str,
        records: Vec<BizRecord>,
    ) -> Result<Vec<String>> {
        self.execute_for_codes(Operation::batch_create(meta_name, records)).await
    }

    /// Update 1 to 30 records that all carry a code; codes come back in input order
    pub async fn batch_update_data(
        &self,
        meta_name: &str,
        records: Vec<BizRecord>,
    ) -> Result<Vec<String>> {
        self.execute_for_codes(Operation::batch_update(meta_name, records)).await
    }

    pub async fn delete_data(&self, meta_name: &str, code: &str) -> Result<String> {
        self.execute_for_code(Operation::delete(meta_name, code)).await
    }

    pub async fn get_data(&self, meta_name: &str, code: &str) -> Result<BizRecord> {
        let request = Operation::get(meta_name, code).to_request()?;
        self.dispatcher.send_json(&request).await
    }

    pub async fn transfer_owner(
        &self,
        meta_name: &str,
        code: &str,
        new_owner: &str,
        add_team: bool,
        dept_follow_new_owner: bool,
    ) -> Result<String> {
        self.execute_for_code(Operation::transfer_owner(
            meta_name,
            code,
            new_owner,
            add_team,
            dept_follow_new_owner,
        ))
        .await
    }

    /// Equality-filter query over a business object
    pub async fn query_data(&self, meta_name: &str, options: &QueryOptions) -> Result<QueryResult> {
        self.query(paths::query(meta_name), meta_name, options).await
    }

    /// Same as `query_data`, for built-in/auxiliary object types
    pub async fn query_auxiliary_data(
        &self,
        meta_name: &str,
        options: &QueryOptions,
    ) -> Result<QueryResult> {
        self.query(paths::auxiliary_query(meta_name), meta_name, options).await
    }

    /// Run a caller-written SQL query
    ///
    /// The string is sent exactly as given. It is not parsed, escaped or
    /// checked here; guarding against injection is up to the caller and the
    /// platform.
    pub async fn query_data_by_sql(&self, sql: &str) -> Result<QueryResult> {
        let request = ApiRequest::post(paths::sql()).json(json!({ "sql": sql }));
        let result: QueryResult = self.dispatcher.send_json(&request).await?;
        debug!("SQL query returned {} of {} records", result.len(), result.total_count);
        Ok(result)
    }

    async fn query(
        &self,
        path: String,
        meta_name: &str,
        options: &QueryOptions,
    ) -> Result<QueryResult> {
        require_meta_name(meta_name)?;
        let body = options.resolve(self.default_page_size)?;
        let request = ApiRequest::post(path).json(serde_json::to_value(&body)?);

        let mut result: QueryResult = self.dispatcher.send_json(&request).await?;
        // Some object types omit the echo of the requested page
        if result.page_size.is_none() {
            result.page_size = Some(body.page_size);
        }
        debug!(
            "Query on {} page {} returned {} of {} records",
            meta_name,
            result.page_no,
            result.len(),
            result.total_count
        );
        Ok(result)
    }

    async fn execute_for_code(&self, operation: Operation) -> Result<String> {
        let request = operation.to_request()?;
        let response: CodeResponse = self.dispatcher.send_json(&request).await?;
        debug!(
            "{} on {} -> {}",
            operation.operation_type(),
            operation.meta_name(),
            response.code
        );
        Ok(response.code)
    }

    async fn execute_for_codes(&self, operation: Operation) -> Result<Vec<String>> {
        let request = operation.to_request()?;
        let response: CodesResponse = self.dispatcher.send_json(&request).await?;

        let expected = operation.record_count();
        if response.codes.len() != expected {
            return Err(HClientError::Decode(format!(
                "{} on {} sent {} records but got {} codes back",
                operation.operation_type(),
                operation.meta_name(),
                expected,
                response.codes.len()
            )));
        }
        debug!(
            "{} on {} -> {} codes",
            operation.operation_type(),
            operation.meta_name(),
            response.codes.len()
        );
        Ok(response.codes)
    }
}
