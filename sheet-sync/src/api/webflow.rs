//! Webflow CMS collection publisher (v1 API)

use log::{debug, info};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use super::models::{ItemFields, PublishPayload};
use super::read_error_body;
use crate::config::WebflowConfig;
use crate::transform::{Record, slugify};

pub const API_VERSION: &str = "1.0.0";

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("record has no usable name field")]
    MissingName,
    #[error("collection request failed")]
    Transport(#[source] reqwest::Error),
    #[error("collection rejected item ({status}): {body}")]
    Status { status: StatusCode, body: String },
    #[error("malformed create-item response")]
    Malformed(#[source] reqwest::Error),
}

impl PublishPayload {
    /// Build the create-item body for a record.
    ///
    /// Items are always created live (not archived, not draft). Missing
    /// `field1`/`field2` cells are left out of the body.
    pub fn from_record(record: &Record) -> Result<Self, PublishError> {
        let name = record.get_text("name").ok_or(PublishError::MissingName)?;
        let slug = slugify(&name);

        Ok(Self {
            fields: ItemFields {
                name,
                slug,
                archived: false,
                draft: false,
                field1: record.get("field1").cloned(),
                field2: record.get("field2").cloned(),
            },
        })
    }
}

pub struct WebflowClient<'a> {
    http: &'a reqwest::Client,
    config: &'a WebflowConfig,
}

impl<'a> WebflowClient<'a> {
    pub fn new(http: &'a reqwest::Client, config: &'a WebflowConfig) -> Self {
        Self { http, config }
    }

    pub fn items_url(&self) -> String {
        format!(
            "{}/collections/{}/items",
            self.config.base_url,
            urlencoding::encode(&self.config.collection_id)
        )
    }

    /// Create one item. Always creates; an item with the same slug is not looked up.
    pub async fn create_item(&self, payload: &PublishPayload) -> Result<Value, PublishError> {
        let url = self.items_url();
        debug!("Creating item '{}' in {}", payload.fields.slug, url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header("accept-version", API_VERSION)
            .json(payload)
            .send()
            .await
            .map_err(PublishError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = read_error_body(response).await;
            return Err(PublishError::Status { status, body });
        }

        let item: Value = response.json().await.map_err(PublishError::Malformed)?;
        info!(
            "Created item '{}' ({})",
            payload.fields.slug,
            item.get("_id").and_then(Value::as_str).unwrap_or("no id")
        );
        Ok(item)
    }
}
