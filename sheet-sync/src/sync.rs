//! Sync orchestration
//!
//! A run is strictly sequential: token, used range, transform, then one
//! create-item call per record, each awaited before the next. The first
//! failure ends the run. Items created before it stay created.

use log::{debug, info};
use thiserror::Error;

use crate::api::{
    AuthClient, AuthError, FetchError, GraphClient, PublishError, PublishPayload, WebflowClient,
};
use crate::config::Config;
use crate::transform::rows_to_records;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to acquire access token")]
    Auth(#[from] AuthError),
    #[error("failed to read worksheet")]
    Fetch(#[from] FetchError),
    #[error("failed to publish record {record} ({published} items already created)")]
    Publish {
        /// 1-based position of the failing record among the data rows
        record: usize,
        published: usize,
        #[source]
        source: PublishError,
    },
}

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Data rows read from the worksheet
    pub records: usize,
    /// Items created in the collection
    pub published: usize,
}

pub struct Syncer<'a> {
    http: &'a reqwest::Client,
    config: &'a Config,
}

impl<'a> Syncer<'a> {
    pub fn new(http: &'a reqwest::Client, config: &'a Config) -> Self {
        Self { http, config }
    }

    pub async fn run(&self) -> Result<SyncReport, SyncError> {
        let token = AuthClient::new(self.http, &self.config.azure)
            .acquire_token()
            .await?;

        let grid = GraphClient::new(self.http, &self.config.workbook)
            .fetch_used_range(&token)
            .await?;

        let records = rows_to_records(&grid);
        info!(
            "Publishing {} records to collection {}",
            records.len(),
            self.config.webflow.collection_id
        );

        let publisher = WebflowClient::new(self.http, &self.config.webflow);
        let mut report = SyncReport {
            records: records.len(),
            published: 0,
        };

        for (index, record) in records.iter().enumerate() {
            let created = match PublishPayload::from_record(record) {
                Ok(payload) => publisher.create_item(&payload).await,
                Err(e) => Err(e),
            };

            if let Err(source) = created {
                return Err(SyncError::Publish {
                    record: index + 1,
                    published: report.published,
                    source,
                });
            }

            report.published += 1;
            debug!(
                "Published record {}/{} ({} fields)",
                index + 1,
                report.records,
                record.len()
            );
        }

        Ok(report)
    }
}
