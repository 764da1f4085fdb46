//! Wire models shared by the upstream clients

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::transform::{CellValue, Grid};

/// Access token issued by the identity provider
#[derive(Clone, Deserialize)]
pub struct TokenInfo {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime in seconds, when the provider reports it
    #[serde(default)]
    pub expires_in: Option<u64>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl fmt::Debug for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenInfo")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// OAuth2 error body (`error`, `error_description`)
#[derive(Debug, Deserialize)]
pub(crate) struct OAuthErrorBody {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// Response of the worksheet `usedRange` resource; only the parts we read
#[derive(Debug, Clone, Deserialize)]
pub struct UsedRange {
    /// A1-style address, e.g. "Sheet1!A1:C3"
    #[serde(default)]
    pub address: Option<String>,
    /// Absent when the service omits the cell values
    #[serde(default)]
    pub values: Option<Grid>,
}

/// Body of a Webflow create-item request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishPayload {
    pub fields: ItemFields,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemFields {
    pub name: String,
    pub slug: String,
    #[serde(rename = "_archived")]
    pub archived: bool,
    #[serde(rename = "_draft")]
    pub draft: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field1: Option<CellValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field2: Option<CellValue>,
}
