use crate::fetcher::traits::CatalogSource;
use crate::model::FetchError;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Downloads the HTML export of a publicly shared Google Doc.
pub struct GoogleDocsFetcher {
    client: Client,
    document_id: String,
}

impl GoogleDocsFetcher {
    pub fn new(document_id: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) TradeLens/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FetchError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            document_id: document_id.into(),
        })
    }

    pub fn export_url(&self) -> String {
        format!(
            "https://docs.google.com/document/d/{}/export?format=html",
            self.document_id
        )
    }
}

#[async_trait::async_trait]
impl CatalogSource for GoogleDocsFetcher {
    async fn fetch(&self) -> Result<String, FetchError> {
        let url = self.export_url();
        info!("Fetching value list: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Value list responded [{}], is the document shared publicly?", status);
            return Err(FetchError::InvalidResponse(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::HttpError(e.to_string()))
    }
}
