use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::traits::CatalogApi;
use super::types::{LibraryDetail, SearchHit, SearchResponse};
use crate::app::CatalogConfig;
use crate::utils::Result;

/// Catalog API over HTTP (`api.cdnjs.com` by default)
pub struct HttpCatalog {
    client: Client,
    api_url: String,
}

impl HttpCatalog {
    /// Create a client for the configured API host
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()?,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn libraries_url(&self) -> String {
        format!("{}/libraries", self.api_url)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    async fn search(&self, term: &str) -> Result<Vec<SearchHit>> {
        let response: SearchResponse = self
            .client
            .get(self.libraries_url())
            .query(&[("search", term)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.results)
    }

    async fn library(&self, name: &str) -> Result<LibraryDetail> {
        let detail = self
            .client
            .get(format!("{}/{}", self.libraries_url(), name))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(detail)
    }
}
