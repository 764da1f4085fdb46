//! Startup configuration
//!
//! All settings come from the process environment (optionally seeded from a
//! `.env` file) and are read exactly once when the process starts. The
//! resulting [`Config`] is passed by reference to every component that talks
//! to an upstream service.

use std::fmt;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";
pub const DEFAULT_WEBFLOW_BASE_URL: &str = "https://api.webflow.com";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Client-credential settings for the Microsoft identity platform
#[derive(Clone)]
pub struct AzureConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    /// Base URL of the token authority, without tenant
    pub authority_host: String,
}

/// Location of the worksheet to read
#[derive(Debug, Clone)]
pub struct WorkbookConfig {
    /// Path of the workbook inside the drive, e.g. "/Reports/items.xlsx"
    pub file_path: String,
    pub worksheet_name: String,
    /// User id or UPN owning the drive. `None` addresses `/me/drive`.
    pub drive_owner: Option<String>,
    pub graph_base_url: String,
}

/// Target Webflow collection
#[derive(Clone)]
pub struct WebflowConfig {
    pub collection_id: String,
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub azure: AzureConfig,
    pub workbook: WorkbookConfig,
    pub webflow: WebflowConfig,
    pub port: u16,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| optional(name).ok_or(ConfigError::Missing(name));

        let port = match optional("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            azure: AzureConfig {
                tenant_id: required("TENANT_ID")?,
                client_id: required("CLIENT_ID")?,
                client_secret: required("CLIENT_SECRET")?,
                authority_host: base_url(optional("AUTHORITY_HOST"), DEFAULT_AUTHORITY_HOST),
            },
            workbook: WorkbookConfig {
                file_path: required("FILE_PATH")?,
                worksheet_name: required("WORKSHEET_NAME")?,
                drive_owner: optional("GRAPH_DRIVE_OWNER"),
                graph_base_url: base_url(optional("GRAPH_BASE_URL"), DEFAULT_GRAPH_BASE_URL),
            },
            webflow: WebflowConfig {
                collection_id: required("COLLECTION_ID")?,
                api_key: required("WEBFLOW_API_KEY")?,
                base_url: base_url(optional("WEBFLOW_BASE_URL"), DEFAULT_WEBFLOW_BASE_URL),
            },
            port,
        })
    }
}

fn base_url(value: Option<String>, default: &str) -> String {
    value
        .as_deref()
        .unwrap_or(default)
        .trim()
        .trim_end_matches('/')
        .to_string()
}

// Secrets stay out of logs
impl fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureConfig")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("authority_host", &self.authority_host)
            .finish()
    }
}

impl fmt::Debug for WebflowConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebflowConfig")
            .field("collection_id", &self.collection_id)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}
