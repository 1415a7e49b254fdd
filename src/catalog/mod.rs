/// cdnjs catalog integration - Gateway
mod client;
mod http;
mod traits;
mod types;

pub use client::CatalogClient;
pub use http::HttpCatalog;
pub use traits::CatalogApi;
#[cfg(test)]
pub use traits::MockCatalogApi;
pub use types::{AssetBundle, LibraryDetail, SearchHit, SearchResponse};
