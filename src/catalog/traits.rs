use async_trait::async_trait;

use super::types::{LibraryDetail, SearchHit};
use crate::utils::Result;

/// Remote queries the catalog service answers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Free-text search; results are in relevance order
    async fn search(&self, term: &str) -> Result<Vec<SearchHit>>;

    /// Full metadata for an exact canonical name
    async fn library(&self, name: &str) -> Result<LibraryDetail>;
}
