use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use super::document::{from_document, to_document, CacheDocument};
use crate::app::{Config, StorageConfig};
use crate::catalog::{CatalogClient, HttpCatalog};
use crate::constants::{CACHE_FILE_NAME, REPOSITORY_SEPARATOR};
use crate::library::LibraryRecord;
use crate::mirror::{AssetMirror, HttpDownloader};
use crate::utils::{CdnjsError, Result};

type RecordKey = (String, String);

/// Resolved libraries, persisted as `cache.json` under the storage root
///
/// Records are keyed by (name, version), so a release is stored once both
/// in memory and on disk. Nothing is ever evicted.
pub struct ResolutionCache {
    records: BTreeMap<RecordKey, LibraryRecord>,
    catalog: CatalogClient,
    mirror: AssetMirror,
    path: PathBuf,
    force_cdn: bool,
}

impl ResolutionCache {
    /// Open the cache with HTTP-backed catalog and downloader
    pub async fn open(config: &Config) -> Result<Self> {
        let catalog = CatalogClient::new(
            Box::new(HttpCatalog::new(&config.catalog)?),
            &config.catalog.cdn_url,
        );
        let mirror = AssetMirror::new(
            Box::new(HttpDownloader::new(config.catalog.timeout_secs)?),
            &config.storage,
        );

        Self::with_parts(catalog, mirror, &config.storage).await
    }

    /// Open the cache with explicit collaborators, loading any persisted document
    pub async fn with_parts(
        catalog: CatalogClient,
        mirror: AssetMirror,
        storage: &StorageConfig,
    ) -> Result<Self> {
        let path = storage.static_root.join(CACHE_FILE_NAME);
        let records = load_records(&path)
            .await?
            .into_iter()
            .map(|record| (key_of(&record), record))
            .collect();

        Ok(Self {
            records,
            catalog,
            mirror,
            path,
            force_cdn: storage.force_cdn,
        })
    }

    /// Location of the persisted document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached records in (name, version) order
    pub fn records(&self) -> impl Iterator<Item = &LibraryRecord> {
        self.records.values()
    }

    /// URL of `filename` (or the default file) in `repository`
    ///
    /// `repository` is `name` or `name/version`. Cache misses are resolved
    /// through the catalog; unless CDN URLs are forced, the record's files
    /// are mirrored locally. The cache is persisted on every call.
    pub async fn get(&mut self, repository: &str, filename: Option<&str>) -> Result<String> {
        let (name, version) = parse_repository(repository);
        let not_found = || CdnjsError::RepositoryNotFound(repository.to_string());

        let key = match self.find_cached(name, version) {
            Some(key) => {
                debug!("Cache hit for {}", repository);
                key
            }
            None => {
                let record = self
                    .catalog
                    .find(name, version)
                    .await
                    .map_err(|err| match err {
                        CdnjsError::RepositoryNotFound(_) => not_found(),
                        other => other,
                    })?
                    .ok_or_else(not_found)?;

                let key = key_of(&record);
                self.records.insert(key.clone(), record);
                key
            }
        };

        if !self.force_cdn {
            let record = self.records.get_mut(&key).ok_or_else(not_found)?;
            let report = self.mirror.mirror(record).await?;
            debug!(
                "Mirrored {}: {} downloaded, {} already present",
                repository, report.downloaded, report.skipped
            );
        }

        self.persist().await?;

        let record = self.records.get(&key).ok_or_else(not_found)?;
        let fragment = filename
            .filter(|name| !name.is_empty())
            .unwrap_or(record.default_file());

        Ok(record.file_url(fragment, !self.force_cdn)?.to_string())
    }

    /// First matching record in (name, version) key order
    ///
    /// Without a version this is the lowest version string, not the latest
    /// release: "10.0.0" sorts before "9.0.0".
    fn find_cached(&self, name: &str, version: Option<&str>) -> Option<RecordKey> {
        self.records
            .iter()
            .find(|(_, record)| record.matches(name, version))
            .map(|(key, _)| key.clone())
    }

    /// Rewrite the whole document through a temporary sibling file
    async fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let document = to_document(self.records.values());
        let json = serde_json::to_string_pretty(&document)?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, &self.path).await?;

        info!("Saved {} cached releases to {}", self.records.len(), self.path.display());
        Ok(())
    }
}

/// Split `name/version`; an empty version counts as absent
pub fn parse_repository(repository: &str) -> (&str, Option<&str>) {
    let mut parts = repository.split(REPOSITORY_SEPARATOR);
    let name = parts.next().unwrap_or_default();
    let version = parts.next().filter(|version| !version.is_empty());
    (name, version)
}

fn key_of(record: &LibraryRecord) -> RecordKey {
    (record.name().to_string(), record.version().to_string())
}

async fn load_records(path: &Path) -> Result<Vec<LibraryRecord>> {
    if !fs::try_exists(path).await? {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).await?;
    let document: CacheDocument = serde_json::from_str(&content)?;
    from_document(document)
}
