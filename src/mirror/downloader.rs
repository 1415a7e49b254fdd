use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::constants::PARTIAL_DOWNLOAD_SUFFIX;
use crate::utils::Result;

/// Fetches a remote asset into a local file
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download `url` to `dest`, returning the number of bytes written.
    /// The parent directory of `dest` already exists.
    async fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// Streaming HTTP downloader
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()?,
        })
    }
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".");
    name.push(PARTIAL_DOWNLOAD_SUFFIX);
    PathBuf::from(name)
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let response = self.client.get(url).send().await?.error_for_status()?;

        // Only a completed body is moved into place
        let partial = partial_path(dest);
        let mut file = fs::File::create(&partial).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;
        drop(file);
        fs::rename(&partial, dest).await?;

        Ok(written)
    }
}
