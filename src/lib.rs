pub mod app;
pub mod cache;
pub mod catalog;
pub mod cli;
pub mod constants;
pub mod library;
pub mod mirror;
pub mod utils;

pub use app::{load_config, Config};
pub use cache::ResolutionCache;
pub use catalog::{CatalogApi, CatalogClient, HttpCatalog};
pub use library::{FileEntry, LibraryRecord};
pub use mirror::{AssetMirror, Downloader, HttpDownloader};
pub use utils::{CdnjsError, Result};
