//! Client-credential token acquisition against the Microsoft identity platform

use log::{debug, info};
use reqwest::StatusCode;
use thiserror::Error;

use super::models::{OAuthErrorBody, TokenInfo};
use super::read_error_body;
use crate::config::AzureConfig;

/// Scope granting the application's configured Graph permissions
pub const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token endpoint unreachable")]
    Transport(#[source] reqwest::Error),
    #[error("identity provider rejected credentials ({status}): {message}")]
    Rejected { status: StatusCode, message: String },
    #[error("malformed token response")]
    Malformed(#[source] reqwest::Error),
}

/// Exchanges the application's client id and secret for a bearer token
pub struct AuthClient<'a> {
    http: &'a reqwest::Client,
    config: &'a AzureConfig,
}

impl<'a> AuthClient<'a> {
    pub fn new(http: &'a reqwest::Client, config: &'a AzureConfig) -> Self {
        Self { http, config }
    }

    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.config.authority_host,
            urlencoding::encode(&self.config.tenant_id)
        )
    }

    /// Request a fresh token. Nothing is cached between calls.
    pub async fn acquire_token(&self) -> Result<TokenInfo, AuthError> {
        let url = self.token_url();
        debug!("Requesting client-credential token from {}", url);

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("scope", GRAPH_DEFAULT_SCOPE),
        ];

        let response = self
            .http
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(AuthError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = read_error_body(response).await;
            let message = match serde_json::from_str::<OAuthErrorBody>(&body) {
                Ok(err) => match err.error_description {
                    Some(description) => format!("{}: {}", err.error, description),
                    None => err.error,
                },
                Err(_) => body,
            };
            return Err(AuthError::Rejected { status, message });
        }

        let token: TokenInfo = response.json().await.map_err(AuthError::Malformed)?;
        info!(
            "Acquired {} token for client {} (expires in {:?}s)",
            token.token_type, self.config.client_id, token.expires_in
        );
        Ok(token)
    }
}
