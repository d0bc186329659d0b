use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::domain::listing::ListingSet;
use crate::error::{PortalError, Result};
use crate::ports::listing_source::ListingSource;

/// Loads `{ properties: [...], complexes: [...] }` from a JSON or YAML file,
/// chosen by extension (`.yaml`/`.yml` → YAML, anything else → JSON).
#[derive(Debug, Clone)]
pub struct FileListingSource {
    path: PathBuf,
}

impl FileListingSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

pub fn parse_listing_file(content: &str, yaml: bool) -> Result<ListingSet> {
    let raw: ListingSet = if yaml {
        serde_yml::from_str(content)?
    } else {
        serde_json::from_str(content)?
    };
    raw.validated()
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

#[async_trait]
impl ListingSource for FileListingSource {
    async fn load(&self) -> Result<ListingSet> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            PortalError::Config(format!(
                "failed to read listing file {}: {e}",
                self.path.display()
            ))
        })?;
        let listings = parse_listing_file(&content, is_yaml(&self.path))?;
        info!(
            path = %self.path.display(),
            properties = listings.properties().len(),
            complexes = listings.complexes().len(),
            "Loaded listing file"
        );
        Ok(listings)
    }

    fn source_name(&self) -> &'static str {
        "file"
    }
}
