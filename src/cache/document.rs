use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::library::{FileEntry, LibraryRecord, Release};
use crate::utils::{CdnjsError, Result};

/// On-disk cache: library name -> keywords and releases
pub type CacheDocument = BTreeMap<String, StoredLibrary>;

/// All cached releases of one library
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLibrary {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub releases: BTreeMap<String, StoredRelease>,
}

/// Persisted `{default, files}` of one version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRelease {
    pub default: String,
    #[serde(default)]
    pub files: BTreeMap<String, StoredFile>,
}

/// File entry as written on disk
///
/// Both keys must be present; `uri` may be `null`. A missing key is kept
/// as `None` here and rejected when the record is rebuilt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    #[serde(default)]
    pub cdn: Option<String>,
    #[serde(default, deserialize_with = "present_key")]
    pub uri: Option<Option<String>>,
}

/// `Some(value)` whenever the key exists, even if its value is `null`
fn present_key<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl From<Release> for StoredRelease {
    fn from(release: Release) -> Self {
        let files = release
            .files
            .into_iter()
            .map(|(name, entry)| {
                let stored = StoredFile {
                    cdn: Some(entry.remote_url),
                    uri: Some(entry.local_url),
                };
                (name, stored)
            })
            .collect();

        Self {
            default: release.default,
            files,
        }
    }
}

impl StoredRelease {
    /// Checked conversion; a file missing `cdn` or `uri` is `InvalidFile`
    pub fn into_release(self) -> Result<Release> {
        let mut files = BTreeMap::new();
        for (name, stored) in self.files {
            match (stored.cdn, stored.uri) {
                (Some(remote_url), Some(local_url)) => {
                    files.insert(name, FileEntry { remote_url, local_url });
                }
                _ => return Err(CdnjsError::InvalidFile(name)),
            }
        }

        Ok(Release {
            default: self.default,
            files,
        })
    }
}

/// Group records by name then version; later records win
pub fn to_document<'a, I>(records: I) -> CacheDocument
where
    I: IntoIterator<Item = &'a LibraryRecord>,
{
    let mut document = CacheDocument::new();
    for record in records {
        let library = document.entry(record.name().to_string()).or_default();
        library.keywords = record.keywords().to_vec();
        library
            .releases
            .insert(record.version().to_string(), record.release().into());
    }
    document
}

/// One record per name x version pair
pub fn from_document(document: CacheDocument) -> Result<Vec<LibraryRecord>> {
    let mut records = Vec::new();
    for (name, library) in document {
        for (version, release) in library.releases {
            records.push(LibraryRecord::from_release(
                name.as_str(),
                version,
                release.into_release()?,
                library.keywords.clone(),
            )?);
        }
    }
    Ok(records)
}
