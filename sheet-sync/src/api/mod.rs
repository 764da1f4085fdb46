//! Upstream API clients
//!
//! One client per external service, each borrowing the shared HTTP client and
//! its own slice of the startup configuration:
//! - [`AuthClient`] exchanges client credentials for a Graph token
//! - [`GraphClient`] reads a worksheet's used range
//! - [`WebflowClient`] creates items in a CMS collection

pub mod auth;
pub mod graph;
pub mod models;
pub mod webflow;

pub use auth::{AuthClient, AuthError};
pub use graph::{FetchError, GraphClient};
pub use models::PublishPayload;
pub use webflow::{PublishError, WebflowClient};

/// Read a failed response's body for error reporting
async fn read_error_body(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(text) if !text.is_empty() => text,
        Ok(_) => "<empty body>".to_string(),
        Err(e) => format!("<unreadable body: {}>", e),
    }
}
