//! Microsoft Graph workbook reader

use log::{debug, info};
use reqwest::StatusCode;
use thiserror::Error;

use super::models::{TokenInfo, UsedRange};
use super::read_error_body;
use crate::config::WorkbookConfig;
use crate::transform::Grid;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("workbook request failed")]
    Transport(#[source] reqwest::Error),
    #[error("workbook request returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("malformed used range response")]
    Malformed(#[source] reqwest::Error),
    #[error("used range has no header row")]
    MissingHeader,
}

pub struct GraphClient<'a> {
    http: &'a reqwest::Client,
    config: &'a WorkbookConfig,
}

impl<'a> GraphClient<'a> {
    pub fn new(http: &'a reqwest::Client, config: &'a WorkbookConfig) -> Self {
        Self { http, config }
    }

    /// URL of the configured worksheet's used range
    pub fn used_range_url(&self) -> String {
        let drive = match &self.config.drive_owner {
            Some(owner) => format!("users/{}/drive", urlencoding::encode(owner)),
            None => "me/drive".to_string(),
        };

        format!(
            "{}/{}/root:{}:/workbook/worksheets/{}/usedRange",
            self.config.graph_base_url,
            drive,
            encode_item_path(&self.config.file_path),
            urlencoding::encode(&self.config.worksheet_name)
        )
    }

    /// Fetch the whole used range in a single request
    pub async fn fetch_used_range(&self, token: &TokenInfo) -> Result<Grid, FetchError> {
        let url = self.used_range_url();
        debug!("Fetching used range: {}", url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = read_error_body(response).await;
            return Err(FetchError::Status { status, body });
        }

        let range: UsedRange = response.json().await.map_err(FetchError::Malformed)?;
        let address = range
            .address
            .clone()
            .unwrap_or_else(|| self.config.worksheet_name.clone());
        let grid = into_grid(range)?;
        info!("Read {} rows from {}", grid.len(), address);
        Ok(grid)
    }
}

/// The grid of a used range; a range without values has no header to read
fn into_grid(range: UsedRange) -> Result<Grid, FetchError> {
    match range.values {
        Some(values) if !values.is_empty() => Ok(values),
        _ => Err(FetchError::MissingHeader),
    }
}

/// Percent-encode each segment of a drive item path, keeping the separators
fn encode_item_path(path: &str) -> String {
    let encoded = path
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");

    if encoded.starts_with('/') {
        encoded
    } else {
        format!("/{}", encoded)
    }
}
