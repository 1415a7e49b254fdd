use serde::Deserialize;

/// Response of `GET /libraries?search=...`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

/// One search result; only the canonical name is used
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    pub name: String,
}

/// Response of `GET /libraries/{name}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibraryDetail {
    pub name: String,
    /// Current version reported by the catalog
    pub version: String,
    /// Conventional entry point, possibly with a directory prefix
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub assets: Vec<AssetBundle>,
}

/// Files published for one version
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetBundle {
    pub version: String,
    #[serde(default)]
    pub files: Vec<String>,
}
