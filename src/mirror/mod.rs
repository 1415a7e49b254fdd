/// Local asset mirroring - Gateway
mod assets;
mod downloader;

pub use assets::{subdirectory, AssetMirror, MirrorReport};
pub use downloader::{Downloader, HttpDownloader};
#[cfg(test)]
pub use downloader::MockDownloader;
