//! Structured query options

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::api::constants::DEFAULT_PAGE_NO;
use crate::api::models::FieldValue;
use crate::error::{HClientError, Result};

/// Field selection, pagination and equality filter for `query_data`
///
/// Unset pagination falls back to page 1 and the client's default page
/// size. Richer predicates than exact match go through SQL queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    /// Fields to return, in order; empty means all
    #[serde(default)]
    pub select_fields: Vec<String>,
    /// 1-based page number
    #[serde(default)]
    pub page_no: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    /// Field name to expected value, all must match
    #[serde(default)]
    pub query: IndexMap<String, FieldValue>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add fields to the selection
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Require `field` to equal `value`
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.query.insert(field.into(), value.into());
        self
    }

    pub fn page(mut self, page_no: u32) -> Self {
        self.page_no = Some(page_no);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Fill pagination defaults and check the values are usable
    pub(crate) fn resolve(&self, default_page_size: u32) -> Result<QueryBody<'_>> {
        let page_no = self.page_no.unwrap_or(DEFAULT_PAGE_NO);
        let page_size = self.page_size.unwrap_or(default_page_size);
        if page_no == 0 {
            return Err(HClientError::validation("pageNo is 1-based, got 0"));
        }
        if page_size == 0 {
            return Err(HClientError::validation("pageSize must be at least 1"));
        }
        Ok(QueryBody {
            select_fields: &self.select_fields,
            page_no,
            page_size,
            query: &self.query,
        })
    }
}

/// Wire body of a structured query
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryBody<'a> {
    pub select_fields: &'a [String],
    pub page_no: u32,
    pub page_size: u32,
    pub query: &'a IndexMap<String, FieldValue>,
}
