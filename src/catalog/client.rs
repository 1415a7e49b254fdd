use std::collections::BTreeMap;
use tracing::info;

use super::traits::CatalogApi;
use super::types::{AssetBundle, LibraryDetail};
use crate::library::{basename, FileEntry, LibraryRecord};
use crate::utils::{CdnjsError, Result};

/// Turns a library name into a validated [`LibraryRecord`]
pub struct CatalogClient {
    api: Box<dyn CatalogApi>,
    cdn_url: String,
}

impl CatalogClient {
    pub fn new(api: Box<dyn CatalogApi>, cdn_url: &str) -> Self {
        Self {
            api,
            cdn_url: cdn_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve `name` at `version`, or at the catalog's current version
    ///
    /// An empty search is a hard `RepositoryNotFound`. A version with no
    /// published files resolves to `Ok(None)`.
    pub async fn find(&self, name: &str, version: Option<&str>) -> Result<Option<LibraryRecord>> {
        let hits = self.api.search(name).await?;
        let canonical = hits
            .into_iter()
            .next()
            .ok_or_else(|| CdnjsError::RepositoryNotFound(name.to_string()))?
            .name;

        let detail = self.api.library(&canonical).await?;
        let record = self.build_record(detail, version)?;

        if record.is_valid() {
            info!("Resolved {} from catalog ({} files)", record, record.files().len());
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }

    fn build_record(&self, detail: LibraryDetail, version: Option<&str>) -> Result<LibraryRecord> {
        let version = version.map_or_else(|| detail.version.clone(), str::to_string);

        let mut record = LibraryRecord::new(
            detail.name.as_str(),
            version.as_str(),
            detail.filename.as_deref().unwrap_or_default(),
            detail.keywords,
        );

        if let Some(bundle) = detail.assets.iter().find(|b| b.version == version) {
            for (file_name, entry) in self.parse_assets(&detail.name, bundle) {
                record.insert_file(file_name, entry)?;
            }
        }

        Ok(record)
    }

    fn parse_assets(&self, name: &str, bundle: &AssetBundle) -> BTreeMap<String, FileEntry> {
        bundle
            .files
            .iter()
            .map(|path| {
                (
                    basename(path).to_string(),
                    FileEntry::remote(self.file_cdn(name, &bundle.version, path)),
                )
            })
            .collect()
    }

    /// `{cdn}/{name}/{version}/{file}`
    pub fn file_cdn(&self, name: &str, version: &str, path: &str) -> String {
        format!("{}/{}/{}/{}", self.cdn_url, name, version, path)
    }
}
