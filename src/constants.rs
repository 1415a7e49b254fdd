/// Constants module to avoid magic values in the codebase

// Catalog endpoints
pub const DEFAULT_API_URL: &str = "https://api.cdnjs.com";
pub const DEFAULT_CDN_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs";

// Timeouts
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

// Local storage
pub const DEFAULT_STATIC_URL: &str = "/static/cdn";
pub const CACHE_FILE_NAME: &str = "cache.json";
pub const PARTIAL_DOWNLOAD_SUFFIX: &str = "part";

// Configuration
pub const APP_NAME: &str = "cdnjs";
pub const ENV_PREFIX: &str = "CDNJS_";
pub const LOCAL_CONFIG_FILE: &str = ".cdnjs.toml";

// Repository identifiers look like `name` or `name/version`
pub const REPOSITORY_SEPARATOR: char = '/';
