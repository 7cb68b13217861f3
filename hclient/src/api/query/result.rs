//! Query results

use serde::{Deserialize, Serialize};

use crate::api::models::BizRecord;

fn first_page() -> u32 {
    1
}

/// Records of one page plus pagination metadata, in upstream order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub records: Vec<BizRecord>,
    /// Total matches across all pages
    #[serde(default, alias = "total")]
    pub total_count: u64,
    #[serde(default = "first_page")]
    pub page_no: u32,
    /// Absent for SQL queries that did not paginate
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl Default for QueryResult {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            total_count: 0,
            page_no: first_page(),
            page_size: None,
        }
    }
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of pages at the current page size
    pub fn total_pages(&self) -> Option<u64> {
        match self.page_size {
            Some(size) if size > 0 => Some(self.total_count.div_ceil(size as u64)),
            _ => None,
        }
    }

    /// Check if pages after this one hold more records
    pub fn has_more(&self) -> bool {
        match self.page_size {
            Some(size) if size > 0 => (self.page_no as u64) * (size as u64) < self.total_count,
            _ => (self.records.len() as u64) < self.total_count,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BizRecord> {
        self.records.iter()
    }
}

impl IntoIterator for QueryResult {
    type Item = BizRecord;
    type IntoIter = std::vec::IntoIter<BizRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a BizRecord;
    type IntoIter = std::slice::Iter<'a, BizRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
