use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use super::downloader::Downloader;
use crate::app::StorageConfig;
use crate::library::{basename, FileEntry, LibraryRecord};
use crate::utils::Result;

/// Outcome of one mirroring pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorReport {
    pub downloaded: usize,
    pub skipped: usize,
}

/// Materializes record files under a local root and rewrites their local URLs
pub struct AssetMirror {
    downloader: Box<dyn Downloader>,
    static_root: PathBuf,
    static_url: String,
}

impl AssetMirror {
    pub fn new(downloader: Box<dyn Downloader>, storage: &StorageConfig) -> Self {
        Self {
            downloader,
            static_root: storage.static_root.clone(),
            static_url: storage.static_url.trim_end_matches('/').to_string(),
        }
    }

    /// Download every missing file of `record` and point its local URLs at the copies
    ///
    /// Existing files are never fetched again. The first failing download
    /// aborts the pass; files written before it stay on disk.
    pub async fn mirror(&self, record: &mut LibraryRecord) -> Result<MirrorReport> {
        let mut report = MirrorReport::default();
        let files: Vec<(String, String)> = record
            .files()
            .iter()
            .map(|(name, entry)| (name.clone(), entry.remote_url.clone()))
            .collect();

        for (file_name, remote_url) in files {
            let subdir = subdirectory(&remote_url, record.version());
            let path = self.local_path(record.name(), record.version(), &subdir, &file_name);

            if fs::try_exists(&path).await? {
                debug!("Already mirrored: {}", path.display());
                report.skipped += 1;
            } else {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).await?;
                }
                let bytes = self.downloader.download(&remote_url, &path).await?;
                info!("Downloaded {} ({} bytes)", remote_url, bytes);
                report.downloaded += 1;
            }

            let local_url = self.local_url(record.name(), record.version(), &subdir, &file_name);
            record.insert_file(
                file_name,
                FileEntry {
                    remote_url,
                    local_url: Some(local_url),
                },
            )?;
        }

        Ok(report)
    }

    /// `<root>/<name>/<version>/<subdir>/<file>`
    pub fn local_path(&self, name: &str, version: &str, subdir: &str, file_name: &str) -> PathBuf {
        let mut path = self.static_root.join(name).join(version);
        if !subdir.is_empty() {
            path.push(Path::new(subdir));
        }
        path.join(file_name)
    }

    /// `<static-url>/<name>/<version>/<subdir>/<file>`
    pub fn local_url(&self, name: &str, version: &str, subdir: &str, file_name: &str) -> String {
        [name, version, subdir, file_name]
            .iter()
            .filter(|part| !part.is_empty())
            .fold(self.static_url.clone(), |url, part| format!("{}/{}", url, part))
    }
}

/// Path between the version segment and the filename of a CDN URL
///
/// `.../jquery/3.0.0/dist/js/jquery.js` gives `dist/js`; an URL without a
/// version segment gives an empty subdirectory.
pub fn subdirectory(remote_url: &str, version: &str) -> String {
    let marker = format!("/{}/", version);
    let Some(start) = remote_url.find(&marker) else {
        return String::new();
    };

    let rest = &remote_url[start + marker.len()..];
    rest.strip_suffix(basename(rest))
        .unwrap_or_default()
        .trim_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::MockDownloader;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    const CDN: &str = "https://cdnjs.cloudflare.com/ajax/libs";

    fn storage(root: &Path) -> StorageConfig {
        StorageConfig {
            static_root: root.to_path_buf(),
            static_url: "/static/cdn/".to_string(),
            force_cdn: false,
        }
    }

    fn bootstrap() -> LibraryRecord {
        let mut record = LibraryRecord::new("bootstrap", "5.3.0", "bootstrap.min.js", Vec::new());
        for path in ["js/bootstrap.min.js", "css/bootstrap.min.css", "LICENSE"] {
            record
                .insert_file(
                    basename(path),
                    FileEntry::remote(format!("{}/bootstrap/5.3.0/{}", CDN, path)),
                )
                .unwrap();
        }
        record
    }

    /// Mock downloader that writes a stub body and counts calls
    fn counting_downloader(calls: Arc<AtomicUsize>) -> MockDownloader {
        let mut downloader = MockDownloader::new();
        downloader.expect_download().returning(move |_, dest| {
            calls.fetch_add(1, Ordering::SeqCst);
            std::fs::write(dest, b"/* asset */")?;
            Ok(11)
        });
        downloader
    }

    #[test]
    fn test_subdirectory() {
        assert_eq!(
            subdirectory(&format!("{}/bootstrap/5.3.0/dist/js/bootstrap.js", CDN), "5.3.0"),
            "dist/js"
        );
        assert_eq!(subdirectory(&format!("{}/jquery/3.0.0/jquery.js", CDN), "3.0.0"), "");
        assert_eq!(subdirectory("https://example.com/jquery.js", "3.0.0"), "");
    }

    #[test]
    fn test_local_path_and_url() {
        let temp_dir = TempDir::new().unwrap();
        let mirror = AssetMirror::new(Box::new(MockDownloader::new()), &storage(temp_dir.path()));

        assert_eq!(
            mirror.local_path("bootstrap", "5.3.0", "js", "bootstrap.min.js"),
            temp_dir.path().join("bootstrap/5.3.0/js/bootstrap.min.js")
        );
        assert_eq!(
            mirror.local_url("bootstrap", "5.3.0", "js", "bootstrap.min.js"),
            "/static/cdn/bootstrap/5.3.0/js/bootstrap.min.js"
        );
        assert_eq!(
            mirror.local_url("bootstrap", "5.3.0", "", "LICENSE"),
            "/static/cdn/bootstrap/5.3.0/LICENSE"
        );
    }

    #[tokio::test]
    async fn test_mirror_rewrites_local_urls() {
        let temp_dir = TempDir::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let mirror = AssetMirror::new(
            Box::new(counting_downloader(calls.clone())),
            &storage(temp_dir.path()),
        );
        let mut record = bootstrap();

        let report = mirror.mirror(&mut record).await.unwrap();

        assert_eq!(report, MirrorReport { downloaded: 3, skipped: 0 });
        assert!(temp_dir.path().join("bootstrap/5.3.0/css/bootstrap.min.css").exists());
        assert!(temp_dir.path().join("bootstrap/5.3.0/LICENSE").exists());
        assert_eq!(
            record.file_url("min.css", true).unwrap(),
            "/static/cdn/bootstrap/5.3.0/css/bootstrap.min.css"
        );
        assert_eq!(
            record.files()["bootstrap.min.css"].remote_url,
            format!("{}/bootstrap/5.3.0/css/bootstrap.min.css", CDN)
        );
    }

    #[tokio::test]
    async fn test_mirror_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let mirror = AssetMirror::new(
            Box::new(counting_downloader(calls.clone())),
            &storage(temp_dir.path()),
        );
        let mut record = bootstrap();

        mirror.mirror(&mut record).await.unwrap();
        let second = mirror.mirror(&mut record).await.unwrap();

        assert_eq!(second, MirrorReport { downloaded: 0, skipped: 3 });
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failed_download_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let mut downloader = MockDownloader::new();
        downloader.expect_download().times(1).returning(|_, _| {
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "offline").into())
        });
        let mirror = AssetMirror::new(Box::new(downloader), &storage(temp_dir.path()));
        let mut record = bootstrap();

        assert!(mirror.mirror(&mut record).await.is_err());
        assert!(record.files().values().all(|f| f.local_url.is_none()));
    }
}
