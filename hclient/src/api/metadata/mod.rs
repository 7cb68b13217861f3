//! Business object schema queries

pub mod models;

pub use models::{FieldMeta, FieldType, ObjectMeta, ObjectMetaDetail, OptionValue};

use log::debug;
use std::sync::Arc;

use super::constants::paths;
use super::dispatcher::{ApiRequest, RequestDispatcher};
use super::operations::require_meta_name;
use crate::error::Result;

/// Read-only access to object schemas. Nothing is cached.
pub struct MetadataClient {
    dispatcher: Arc<RequestDispatcher>,
}

impl MetadataClient {
    pub fn new(dispatcher: Arc<RequestDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// List every business object type visible to the configured identity
    pub async fn get_objects(&self) -> Result<Vec<ObjectMeta>> {
        let objects: Vec<ObjectMeta> = self
            .dispatcher
            .send_json(&ApiRequest::get(paths::objects()))
            .await?;
        debug!("Fetched {} object definitions", objects.len());
        Ok(objects)
    }

    /// Describe one object type and its fields
    ///
    /// Fails with `NotFound` when `meta_name` is unknown to the platform.
    pub async fn get_object_description(&self, meta_name: &str) -> Result<ObjectMetaDetail> {
        require_meta_name(meta_name)?;
        self.dispatcher
            .send_json(&ApiRequest::get(paths::object_description(meta_name)))
            .await
    }
}
