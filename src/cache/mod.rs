/// Resolution cache - Gateway
mod document;
mod store;

pub use document::{
    from_document, to_document, CacheDocument, StoredFile, StoredLibrary, StoredRelease,
};
pub use store::{parse_repository, ResolutionCache};
