/// Resolved library records - Gateway
mod matching;
mod record;

pub use matching::{basename, contains_fragment};
pub use record::{FileEntry, LibraryRecord, Release};
