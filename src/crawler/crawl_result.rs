use crate::crawler::canonical::ResourceKind;
use crate::crawler::crawl_error::CrawlError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

const PAGE_SUFFIXES: &[&str] = &["/", "html", "php", "js", "css"];

/// Everything a crawl discovered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlResult {
    pub pages: Vec<String>,
    pub resources: BTreeMap<ResourceKind, Vec<String>>,
    pub external: Vec<String>,
    pub comments: Vec<String>,
    pub emails: Vec<String>,
    /// Set when the crawl stopped early because the target became unreachable.
    #[serde(default)]
    pub aborted: bool,
}

impl CrawlResult {
    pub fn resources_of(&self, kind: ResourceKind) -> &[String] {
        self.resources
            .get(&kind)
            .map(|urls| urls.as_slice())
            .unwrap_or(&[])
    }

    pub fn resource_count(&self) -> usize {
        self.resources.values().map(|urls| urls.len()).sum()
    }

    pub fn suspicious_pages(&self) -> impl Iterator<Item = &str> {
        self.pages
            .iter()
            .map(|page| page.as_str())
            .filter(|page| is_suspicious(page))
    }

    pub fn save(&self, output_path: &Path) -> Result<(), CrawlError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(output_path, json)?;
        info!("Crawl report saved to {}", output_path.display());
        Ok(())
    }

    pub fn load(input_path: &Path) -> Result<Self, CrawlError> {
        let content = std::fs::read_to_string(input_path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Sort key that groups URLs by the extension of their last path segment.
pub fn url_extension(url: &str) -> String {
    let file_name = url.rsplit('/').next().unwrap_or(url);
    match file_name.rsplit_once('.') {
        Some((_, extension)) => extension.to_lowercase(),
        None => String::new(),
    }
}

/// Orders pages by extension, then alphabetically.
pub fn sort_pages(pages: &mut [String]) {
    pages.sort_by(|lhs, rhs| {
        url_extension(lhs)
            .cmp(&url_extension(rhs))
            .then_with(|| lhs.cmp(rhs))
    });
}

/// A URL without a query string that does not end like a page, a directory or a
/// common asset. These are often extensionless endpoints worth a manual look.
pub fn is_suspicious(url: &str) -> bool {
    !url.contains('?') && !PAGE_SUFFIXES.iter().any(|suffix| url.ends_with(suffix))
}
