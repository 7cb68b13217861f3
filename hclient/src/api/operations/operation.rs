//! Record operations and their wire requests

use reqwest::Method;
use serde_json::{Value, json};

use crate::api::constants::{MAX_BATCH_SIZE, paths};
use crate::api::dispatcher::ApiRequest;
use crate::api::models::BizRecord;
use crate::error::{HClientError, Result};

/// A single write or read against one business record (or a batch of them)
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Create a new record; the platform assigns its code
    Create {
        /// Object API name (e.g., "lead")
        meta_name: String,
        record: BizRecord,
    },
    /// Update fields of an existing record
    Update {
        meta_name: String,
        code: String,
        record: BizRecord,
    },
    /// Create up to 30 records in one call
    BatchCreate {
        meta_name: String,
        records: Vec<BizRecord>,
    },
    /// Update up to 30 records in one call; each record carries its code
    BatchUpdate {
        meta_name: String,
        records: Vec<BizRecord>,
    },
    /// Delete a record
    Delete { meta_name: String, code: String },
    /// Fetch a single record
    Get { meta_name: String, code: String },
    /// Hand a record to another owner
    TransferOwner {
        meta_name: String,
        code: String,
        /// Code of the user taking ownership
        new_owner: String,
        /// Keep the previous owner on the record's team as a follower
        add_team: bool,
        /// Move the record to the new owner's department
        dept_follow_new_owner: bool,
    },
}

impl Operation {
    pub fn create(meta_name: impl Into<String>, record: BizRecord) -> Self {
        Self::Create {
            meta_name: meta_name.into(),
            record,
        }
    }

    pub fn update(
        meta_name: impl Into<String>,
        code: impl Into<String>,
        record: BizRecord,
    ) -> Self {
        Self::Update {
            meta_name: meta_name.into(),
            code: code.into(),
            record,
        }
    }

    pub fn batch_create(meta_name: impl Into<String>, records: Vec<BizRecord>) -> Self {
        Self::BatchCreate {
            meta_name: meta_name.into(),
            records,
        }
    }

    pub fn batch_update(meta_name: impl Into<String>, records: Vec<BizRecord>) -> Self {
        Self::BatchUpdate {
            meta_name: meta_name.into(),
            records,
        }
    }

    pub fn delete(meta_name: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Delete {
            meta_name: meta_name.into(),
            code: code.into(),
        }
    }

    pub fn get(meta_name: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Get {
            meta_name: meta_name.into(),
            code: code.into(),
        }
    }

    pub fn transfer_owner(
        meta_name: impl Into<String>,
        code: impl Into<String>,
        new_owner: impl Into<String>,
        add_team: bool,
        dept_follow_new_owner: bool,
    ) -> Self {
        Self::TransferOwner {
            meta_name: meta_name.into(),
            code: code.into(),
            new_owner: new_owner.into(),
            add_team,
            dept_follow_new_owner,
        }
    }

    /// Get the object API name for this operation
    pub fn meta_name(&self) -> &str {
        match self {
            Self::Create { meta_name, .. }
            | Self::Update { meta_name, .. }
            | Self::BatchCreate { meta_name, .. }
            | Self::BatchUpdate { meta_name, .. }
            | Self::Delete { meta_name, .. }
            | Self::Get { meta_name, .. }
            | Self::TransferOwner { meta_name, .. } => meta_name,
        }
    }

    /// Get the HTTP method for this operation
    pub fn http_method(&self) -> Method {
        match self {
            Self::Create { .. } => Method::POST,
            Self::Update { .. } => Method::PUT,
            Self::BatchCreate { .. } => Method::POST,
            Self::BatchUpdate { .. } => Method::PUT,
            Self::Delete { .. } => Method::DELETE,
            Self::Get { .. } => Method::GET,
            Self::TransferOwner { .. } => Method::POST,
        }
    }

    /// Get the operation type as a string
    pub fn operation_type(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::BatchCreate { .. } => "batch_create",
            Self::BatchUpdate { .. } => "batch_update",
            Self::Delete { .. } => "delete",
            Self::Get { .. } => "get",
            Self::TransferOwner { .. } => "transfer_owner",
        }
    }

    /// Number of records this operation touches
    pub fn record_count(&self) -> usize {
        match self {
            Self::BatchCreate { records, .. } | Self::BatchUpdate { records, .. } => records.len(),
            _ => 1,
        }
    }

    /// Local checks that run before anything is sent
    pub fn validate(&self) -> Result<()> {
        require_meta_name(self.meta_name())?;

        match self {
            Self::Create { record, .. } => {
                if let Some(code) = record.code() {
                    return Err(HClientError::validation(format!(
                        "a record to create must not carry a code, got '{}'",
                        code
                    )));
                }
            }
            Self::Update { code, record, .. } => {
                require_code(code)?;
                if let Some(carried) = record.code() {
                    if carried != code {
                        return Err(HClientError::validation(format!(
                            "record code '{}' does not match target code '{}'",
                            carried, code
                        )));
                    }
                }
            }
            Self::BatchCreate { records, .. } => {
                check_batch_size(records)?;
            }
            Self::BatchUpdate { records, .. } => {
                check_batch_size(records)?;
                if let Some(index) = records.iter().position(|r| r.code().is_none()) {
                    return Err(HClientError::validation(format!(
                        "record {} of the batch update has no code",
                        index
                    )));
                }
            }
            Self::Delete { code, .. } | Self::Get { code, .. } => {
                require_code(code)?;
            }
            Self::TransferOwner {
                code, new_owner, ..
            } => {
                require_code(code)?;
                if new_owner.trim().is_empty() {
                    return Err(HClientError::validation("new owner code is empty"));
                }
            }
        }
        Ok(())
    }

    /// Validate and build the dispatcher request
    pub fn to_request(&self) -> Result<ApiRequest> {
        self.validate()?;

        let request = match self {
            Self::Create { meta_name, record } => {
                ApiRequest::post(paths::records(meta_name)).json(to_json(record)?)
            }
            Self::Update {
                meta_name,
                code,
                record,
            } => ApiRequest::put(paths::record(meta_name, code)).json(to_json(record)?),
            Self::BatchCreate { meta_name, records } => {
                ApiRequest::post(paths::batch(meta_name)).json(json!({ "records": records }))
            }
            Self::BatchUpdate { meta_name, records } => {
                ApiRequest::put(paths::batch(meta_name)).json(json!({ "records": records }))
            }
            Self::Delete { meta_name, code } => ApiRequest::delete(paths::record(meta_name, code)),
            Self::Get { meta_name, code } => ApiRequest::get(paths::record(meta_name, code)),
            Self::TransferOwner {
                meta_name,
                code,
                new_owner,
                add_team,
                dept_follow_new_owner,
            } => ApiRequest::post(paths::transfer(meta_name, code)).json(json!({
                "newOwner": new_owner,
                "addTeam": flag(*add_team),
                "deptFollowNewOwner": flag(*dept_follow_new_owner),
            })),
        };

        debug_assert_eq!(request.method, self.http_method());
        Ok(request)
    }
}

/// The platform encodes switches as 0/1
fn flag(value: bool) -> u8 {
    u8::from(value)
}

fn to_json(record: &BizRecord) -> Result<Value> {
    Ok(serde_json::to_value(record)?)
}

fn check_batch_size(records: &[BizRecord]) -> Result<()> {
    if records.is_empty() {
        return Err(HClientError::validation("batch must contain at least one record"));
    }
    if records.len() > MAX_BATCH_SIZE {
        return Err(HClientError::validation(format!(
            "batch holds {} records, the platform accepts at most {}",
            records.len(),
            MAX_BATCH_SIZE
        )));
    }
    Ok(())
}

pub(crate) fn require_meta_name(meta_name: &str) -> Result<()> {
    if meta_name.trim().is_empty() {
        return Err(HClientError::validation("object API name (metaName) is empty"));
    }
    Ok(())
}

fn require_code(code: &str) -> Result<()> {
    if code.trim().is_empty() {
        return Err(HClientError::validation("record code is empty"));
    }
    Ok(())
}
