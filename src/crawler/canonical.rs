//! URL canonicalization.
//!
//! Every URL that reaches the frontier goes through these functions first, so two
//! links that only differ by fragment (or, for resources, by file name) end up as
//! the same string.

use crate::crawler::crawl_error::CrawlError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Extensions that are never crawled as pages; links to them are collapsed to
/// their containing directory.
pub const DEFAULT_TRUNCATED_EXTENSIONS: &[&str] = &[
    "css", "less", "js", "woff", "woff2", "ttf", "eot", "otf", "png", "jpg", "jpeg", "gif",
    "svg", "webp", "ico", "psd", "mp4", "mp3", "webm", "txt", "mo", "po", "pot", "pdf", "doc",
    "docx", "xls", "xlsx", "ppt", "pptx", "odt",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    #[serde(rename = "css")]
    Stylesheet,
    #[serde(rename = "js")]
    Script,
    #[serde(rename = "documents")]
    Document,
    #[serde(rename = "images")]
    Image,
    /// Any other file-like link (text files, media, fonts, extensionless `src`).
    #[serde(rename = "other")]
    Other,
}

impl ResourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Stylesheet => "css",
            ResourceKind::Script => "js",
            ResourceKind::Document => "documents",
            ResourceKind::Image => "images",
            ResourceKind::Other => "other",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolves `href` against `base`. Returns `None` for links that cannot be joined.
pub fn absolute(base: &Url, href: &str) -> Option<Url> {
    base.join(href.trim()).ok()
}

/// Removes the `#fragment` component only.
pub fn strip_fragment(url: &Url) -> Url {
    let mut stripped_url = url.clone();
    stripped_url.set_fragment(None);
    stripped_url
}

/// Drops the last path segment, the query and the fragment, leaving a trailing `/`.
pub fn truncate_to_directory(url: &Url) -> Url {
    let mut truncated_url = url.clone();
    let directory = match url.path().rfind('/') {
        Some(index) => url.path()[..=index].to_owned(),
        None => "/".to_owned(),
    };
    truncated_url.set_path(&directory);
    truncated_url.set_query(None);
    truncated_url.set_fragment(None);
    truncated_url
}

/// The string form used as frontier identity for page links.
pub fn canonicalize(url: &Url) -> String {
    strip_fragment(url).to_string()
}

/// String-prefix containment against the crawl root.
pub fn is_in_scope(url: &str, root: &str) -> bool {
    url.starts_with(root)
}

/// Lower-cased extension of the last path segment, if it has one.
pub fn path_extension(url: &Url) -> Option<String> {
    let file_name = url.path_segments()?.next_back()?;
    let (_, extension) = file_name.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    Some(extension.to_ascii_lowercase())
}

/// Whether a link should be collapsed to its directory before submission.
pub fn is_truncated<S: AsRef<str>>(url: &Url, extensions: &[S]) -> bool {
    match path_extension(url) {
        Some(extension) => extensions
            .iter()
            .any(|candidate| candidate.as_ref().eq_ignore_ascii_case(&extension)),
        None => false,
    }
}

/// Buckets a resource link by extension. Unknown or missing extensions are `Other`.
pub fn classify_resource(url: &Url) -> ResourceKind {
    match path_extension(url).as_deref() {
        Some("css" | "less") => ResourceKind::Stylesheet,
        Some("js" | "mjs") => ResourceKind::Script,
        Some("pdf" | "doc" | "docx" | "xls" | "xlsx" | "ppt" | "pptx" | "odt") => {
            ResourceKind::Document
        }
        Some("png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "ico" | "bmp") => {
            ResourceKind::Image
        }
        _ => ResourceKind::Other,
    }
}

/// Parses the operator-supplied seed, defaulting to `http://` when no scheme is given.
pub fn parse_seed(raw: &str) -> Result<Url, CrawlError> {
    let raw = raw.trim();
    let lowered = raw.to_ascii_lowercase();
    let candidate = if lowered.starts_with("http://") || lowered.starts_with("https://") {
        raw.to_owned()
    } else {
        format!("http://{}", raw)
    };
    let seed = Url::parse(&candidate).map_err(|source| CrawlError::InvalidSeed {
        url: raw.to_owned(),
        source,
    })?;
    if !seed.has_host() {
        return Err(CrawlError::ConfigurationError(format!(
            "Seed URL '{}' has no host",
            raw
        )));
    }
    Ok(seed)
}

/// The crawl root: the seed's directory, always ending in `/`.
pub fn crawl_root(seed: &Url) -> Url {
    truncate_to_directory(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn absolute_resolution_forms() {
        let base = url("https://example.com/dir/page.php?x=1");
        assert_eq!(
            absolute(&base, "/root.php").unwrap().as_str(),
            "https://example.com/root.php"
        );
        assert_eq!(
            absolute(&base, "sibling.php").unwrap().as_str(),
            "https://example.com/dir/sibling.php"
        );
        assert_eq!(
            absolute(&base, "//cdn.example.org/lib.js").unwrap().as_str(),
            "https://cdn.example.org/lib.js"
        );
        assert_eq!(
            absolute(&base, "http://other.com/a").unwrap().as_str(),
            "http://other.com/a"
        );
    }

    #[test]
    fn strip_fragment_keeps_query() {
        let stripped = strip_fragment(&url("https://example.com/a.php?id=3#top"));
        assert_eq!(stripped.as_str(), "https://example.com/a.php?id=3");
    }

    #[test]
    fn truncate_to_directory_drops_file() {
        assert_eq!(
            truncate_to_directory(&url("https://example.com/a/b/c.png?v=2#x")).as_str(),
            "https://example.com/a/b/"
        );
        assert_eq!(
            truncate_to_directory(&url("https://example.com/a/b/")).as_str(),
            "https://example.com/a/b/"
        );
        assert_eq!(
            truncate_to_directory(&url("https://example.com")).as_str(),
            "https://example.com/"
        );
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let inputs = [
            "https://example.com",
            "https://example.com/a/../b/./c.php#frag",
            "HTTPS://Example.COM:443/x?y=1#z",
            "http://example.com/dir/",
            "http://example.com/%7Euser/index.html",
        ];
        for input in inputs {
            let once = canonicalize(&url(input));
            let twice = canonicalize(&url(&once));
            assert_eq!(once, twice, "canonicalize not idempotent for {}", input);

            let dir_once = truncate_to_directory(&url(input));
            let dir_twice = truncate_to_directory(&dir_once);
            assert_eq!(dir_once, dir_twice);
        }
    }

    #[test]
    fn scope_is_string_prefix() {
        let root = "https://example.com/";
        assert!(is_in_scope("https://example.com/a", root));
        assert!(is_in_scope("https://example.com/", root));
        assert!(!is_in_scope("https://evil.com/", root));
        assert!(!is_in_scope("https://example.com.evil.com/", root));
        assert!(!is_in_scope("http://example.com/a", root));
        assert!(is_in_scope("https://example.com/app/x", "https://example.com/app/"));
        assert!(!is_in_scope("https://example.com/other", "https://example.com/app/"));
    }

    #[test]
    fn classify_by_extension() {
        assert_eq!(
            classify_resource(&url("https://e.com/s/site.CSS")),
            ResourceKind::Stylesheet
        );
        assert_eq!(classify_resource(&url("https://e.com/app.js?v=1")), ResourceKind::Script);
        assert_eq!(classify_resource(&url("https://e.com/cv.pdf")), ResourceKind::Document);
        assert_eq!(classify_resource(&url("https://e.com/i/x.png")), ResourceKind::Image);
    }

    #[test]
    fn unknown_resources_fall_back_to_other() {
        assert_eq!(classify_resource(&url("https://e.com/notes/passwords.txt")), ResourceKind::Other);
        assert_eq!(classify_resource(&url("https://e.com/media/intro.mp4")), ResourceKind::Other);
        assert_eq!(classify_resource(&url("https://e.com/avatar?id=3")), ResourceKind::Other);
        assert_eq!(classify_resource(&url("https://e.com/v1.2/api")), ResourceKind::Other);
        assert_eq!(ResourceKind::Other.label(), "other");
    }

    #[test]
    fn truncated_extensions_match_last_segment_only() {
        let list = DEFAULT_TRUNCATED_EXTENSIONS;
        assert!(is_truncated(&url("https://e.com/img/x.png"), list));
        assert!(is_truncated(&url("https://e.com/resume.pdf"), list));
        assert!(!is_truncated(&url("https://e.com/static.css/page"), list));
        assert!(!is_truncated(&url("https://e.com/posts"), list));
    }

    #[test]
    fn seed_parsing() {
        assert_eq!(parse_seed("example.com").unwrap().as_str(), "http://example.com/");
        assert_eq!(
            parse_seed("https://example.com/app/index.php").unwrap().as_str(),
            "https://example.com/app/index.php"
        );
        assert!(parse_seed("http://").is_err());
        assert_eq!(parse_seed("httpbin.org").unwrap().as_str(), "http://httpbin.org/");
        assert_eq!(
            parse_seed("http-api.local/v1/").unwrap().as_str(),
            "http://http-api.local/v1/"
        );
        assert_eq!(parse_seed("HTTPS://example.com").unwrap().as_str(), "https://example.com/");
        assert_eq!(
            crawl_root(&parse_seed("https://example.com/app/index.php").unwrap()).as_str(),
            "https://example.com/app/"
        );
    }
}
