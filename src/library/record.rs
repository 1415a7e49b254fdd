use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::matching::{basename, contains_fragment};
use crate::utils::{CdnjsError, Result};

/// A single asset of a resolved library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Fully-qualified CDN URL
    #[serde(rename = "cdn")]
    pub remote_url: String,
    /// Public URL of the mirrored copy, once downloaded
    #[serde(rename = "uri")]
    pub local_url: Option<String>,
}

impl FileEntry {
    /// Entry that has not been mirrored yet
    pub fn remote(remote_url: impl Into<String>) -> Self {
        Self {
            remote_url: remote_url.into(),
            local_url: None,
        }
    }
}

/// Persisted shape of one release: `{default, files}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub default: String,
    pub files: BTreeMap<String, FileEntry>,
}

/// One library resolved at one version
///
/// Files are keyed by their clean filename and iterate in lexicographic
/// order, which fixes the result of substring lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRecord {
    name: String,
    version: String,
    default_file: String,
    files: BTreeMap<String, FileEntry>,
    keywords: Vec<String>,
}

impl LibraryRecord {
    /// Create an empty record; `default_file` is reduced to its basename
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        default_file: &str,
        keywords: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            default_file: basename(default_file).to_string(),
            files: BTreeMap::new(),
            keywords,
        }
    }

    /// Rebuild a record from its persisted release, validating every file
    pub fn from_release(
        name: impl Into<String>,
        version: impl Into<String>,
        release: Release,
        keywords: Vec<String>,
    ) -> Result<Self> {
        let mut record = Self::new(name, version, &release.default, keywords);
        for (file_name, entry) in release.files {
            record.insert_file(file_name, entry)?;
        }
        Ok(record)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn default_file(&self) -> &str {
        &self.default_file
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn files(&self) -> &BTreeMap<String, FileEntry> {
        &self.files
    }

    /// A record is usable only if it carries at least one file
    pub fn is_valid(&self) -> bool {
        !self.files.is_empty()
    }

    /// Fuzzy match on name or keywords, exact match on version when given
    pub fn matches(&self, name: &str, version: Option<&str>) -> bool {
        let name_matches = contains_fragment(self.keywords.iter().map(String::as_str), name)
            || self.name.contains(name);

        name_matches && version.map_or(true, |v| v == self.version)
    }

    /// True if any clean filename contains `fragment`
    pub fn contains_file(&self, fragment: &str) -> bool {
        contains_fragment(self.files.keys().map(String::as_str), fragment)
    }

    /// First file whose clean filename contains `fragment`
    pub fn find_file(&self, fragment: &str) -> Result<(&str, &FileEntry)> {
        self.files
            .iter()
            .find(|(file_name, _)| file_name.contains(fragment))
            .map(|(file_name, entry)| (file_name.as_str(), entry))
            .ok_or_else(|| CdnjsError::FileNotFound {
                file: fragment.to_string(),
                library: self.name.clone(),
            })
    }

    /// URL of the first file matching `fragment`
    ///
    /// With `prefer_local` the mirrored URL is returned; an entry that has
    /// not been mirrored falls back to its CDN URL.
    pub fn file_url(&self, fragment: &str, prefer_local: bool) -> Result<&str> {
        let (_, entry) = self.find_file(fragment)?;
        match (&entry.local_url, prefer_local) {
            (Some(local), true) => Ok(local.as_str()),
            _ => Ok(entry.remote_url.as_str()),
        }
    }

    /// Validated insertion; replaces any entry with the same filename
    pub fn insert_file(&mut self, file_name: impl Into<String>, entry: FileEntry) -> Result<()> {
        let file_name = file_name.into();

        let bad_name = file_name.is_empty() || file_name.contains('/');
        let bad_urls = entry.remote_url.is_empty()
            || entry.local_url.as_deref().is_some_and(str::is_empty);
        if bad_name || bad_urls {
            return Err(CdnjsError::InvalidFile(file_name));
        }

        self.files.insert(file_name, entry);
        Ok(())
    }

    /// Persisted `{default, files}` value for this release
    pub fn release(&self) -> Release {
        Release {
            default: self.default_file.clone(),
            files: self.files.clone(),
        }
    }
}

impl fmt::Display for LibraryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}/{}>", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jquery() -> LibraryRecord {
        let mut record = LibraryRecord::new(
            "jquery",
            "3.0.0",
            "dist/jquery.min.js",
            vec!["dom".to_string(), "ajax".to_string()],
        );
        for file in ["jquery.js", "jquery.min.js", "jquery.min.map"] {
            record
                .insert_file(
                    file,
                    FileEntry::remote(format!(
                        "https://cdnjs.cloudflare.com/ajax/libs/jquery/3.0.0/{}",
                        file
                    )),
                )
                .unwrap();
        }
        record
    }

    #[test]
    fn test_default_file_is_basename() {
        let record = jquery();
        assert_eq!(record.default_file(), "jquery.min.js");
        assert_eq!(record.to_string(), "<jquery/3.0.0>");
    }

    #[test]
    fn test_matches() {
        let record = jquery();

        assert!(record.matches("jquery", None));
        assert!(record.matches("quer", Some("3.0.0")));
        assert!(record.matches("aja", None)); // keyword hit
        assert!(!record.matches("jquery", Some("2.2.4")));
        assert!(!record.matches("react", None));
    }

    #[test]
    fn test_matches_own_name_without_keywords() {
        let record = LibraryRecord::new("lodash", "4.17.21", "lodash.js", Vec::new());
        assert!(record.matches("lodash", None));
        assert!(record.matches("dash", Some("4.17.21")));
    }

    #[test]
    fn test_find_file_first_in_order() {
        let record = jquery();

        // "jquery.js" sorts before "jquery.min.js"
        let (name, _) = record.find_file("jquery").unwrap();
        assert_eq!(name, "jquery.js");

        let (name, _) = record.find_file("map").unwrap();
        assert_eq!(name, "jquery.min.map");

        assert!(record.contains_file("min"));
        assert!(!record.contains_file("slim"));
    }

    #[test]
    fn test_missing_file() {
        let record = jquery();
        match record.find_file("slim") {
            Err(CdnjsError::FileNotFound { file, library }) => {
                assert_eq!(file, "slim");
                assert_eq!(library, "jquery");
            }
            other => panic!("expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_file_url_prefers_local_when_mirrored() {
        let mut record = jquery();
        record
            .insert_file(
                "jquery.min.js",
                FileEntry {
                    remote_url: "https://cdnjs.cloudflare.com/ajax/libs/jquery/3.0.0/jquery.min.js"
                        .to_string(),
                    local_url: Some("/static/cdn/jquery/3.0.0/jquery.min.js".to_string()),
                },
            )
            .unwrap();

        assert_eq!(
            record.file_url("min.js", true).unwrap(),
            "/static/cdn/jquery/3.0.0/jquery.min.js"
        );
        assert_eq!(
            record.file_url("min.js", false).unwrap(),
            "https://cdnjs.cloudflare.com/ajax/libs/jquery/3.0.0/jquery.min.js"
        );
        // Not mirrored yet
        assert!(record.file_url("jquery.js", true).unwrap().starts_with("https://"));
    }

    #[test]
    fn test_insert_rejects_invalid_entries() {
        let mut record = jquery();

        assert!(matches!(
            record.insert_file("a.js", FileEntry::remote("")),
            Err(CdnjsError::InvalidFile(_))
        ));
        assert!(matches!(
            record.insert_file("dist/a.js", FileEntry::remote("https://x/a.js")),
            Err(CdnjsError::InvalidFile(_))
        ));
        assert!(matches!(
            record.insert_file(
                "a.js",
                FileEntry {
                    remote_url: "https://x/a.js".to_string(),
                    local_url: Some(String::new()),
                }
            ),
            Err(CdnjsError::InvalidFile(_))
        ));
        assert_eq!(record.files().len(), 3);
    }

    #[test]
    fn test_release_round_trip() {
        let record = jquery();
        let json = serde_json::to_string(&record.release()).unwrap();
        let release: Release = serde_json::from_str(&json).unwrap();
        let restored =
            LibraryRecord::from_release("jquery", "3.0.0", release, record.keywords().to_vec())
                .unwrap();

        assert_eq!(restored, record);
        assert!(json.contains("\"cdn\""));
        assert!(json.contains("\"uri\":null"));
    }
}
