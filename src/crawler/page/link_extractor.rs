//! Pulls links, comments and email addresses out of an HTML document.
//!
//! Extraction is a pure function of the body and the page URLs: it returns a list
//! of [`Discovery`] values and leaves it to the caller to feed them into the
//! frontier and the aggregator.

use crate::crawler::canonical::{
    ResourceKind, absolute, canonicalize, classify_resource, is_truncated, truncate_to_directory,
};
use crate::crawler::crawl_error::CrawlError;
use crate::crawler::crawler_config::CrawlerConfig;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

const HREF_SELECTOR: &str = "a[href], area[href], link[href]";
const FRAME_SELECTOR: &str = "iframe[src], frame[src]";
const SRC_SELECTOR: &str =
    "img[src], script[src], embed[src], source[src], video[src], audio[src], track[src]";
const ONCLICK_SELECTOR: &str = "[onclick]";

const ONCLICK_PATTERN: &str = r#"location(?:\.href)?\s*=\s*['"]([^'"]+)['"]"#;
const EMAIL_PATTERN: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// A crawlable URL, fragment already stripped.
    Page(String),
    /// A file-like link: `explorable` is its directory, `resource` the full URL.
    Resource {
        explorable: String,
        resource: String,
        kind: ResourceKind,
    },
    Email(String),
    Comment(String),
}

pub struct LinkExtractor {
    href_selector: Selector,
    frame_selector: Selector,
    src_selector: Selector,
    onclick_selector: Selector,
    onclick_pattern: Regex,
    email_pattern: Regex,
    truncated_extensions: Vec<String>,
    capture_comments: bool,
    capture_text_emails: bool,
}

impl LinkExtractor {
    pub fn new(config: &CrawlerConfig) -> Result<Self, CrawlError> {
        Ok(Self {
            href_selector: parse_selector(HREF_SELECTOR)?,
            frame_selector: parse_selector(FRAME_SELECTOR)?,
            src_selector: parse_selector(SRC_SELECTOR)?,
            onclick_selector: parse_selector(ONCLICK_SELECTOR)?,
            onclick_pattern: Regex::new(ONCLICK_PATTERN)?,
            email_pattern: Regex::new(EMAIL_PATTERN)?,
            truncated_extensions: config.truncated_extensions().to_vec(),
            capture_comments: config.print_comments(),
            capture_text_emails: config.print_emails(),
        })
    }

    /// `requested` is the URL the task asked for, `effective` where the response came
    /// from. Root-relative links resolve against the former, everything else against
    /// the latter.
    pub fn extract(&self, body: &str, requested: &Url, effective: &Url) -> Vec<Discovery> {
        let document = Html::parse_document(body);
        let mut discoveries = Vec::new();

        for element in document.select(&self.href_selector) {
            if let Some(href) = element.value().attr("href") {
                discoveries.extend(self.discover_href(href, requested, effective));
            }
        }

        for element in document.select(&self.frame_selector) {
            if let Some(src) = element.value().attr("src") {
                discoveries.extend(self.discover_href(src, requested, effective));
            }
        }

        for element in document.select(&self.src_selector) {
            if let Some(src) = element.value().attr("src") {
                if let Some(url) = resolve(src, requested, effective) {
                    discoveries.push(resource_discovery(&url));
                }
            }
        }

        for element in document.select(&self.onclick_selector) {
            if let Some(onclick) = element.value().attr("onclick") {
                for captures in self.onclick_pattern.captures_iter(onclick) {
                    discoveries.extend(self.discover_href(&captures[1], requested, effective));
                }
            }
        }

        if self.capture_comments {
            for node in document.tree.root().descendants() {
                if let Some(comment) = node.value().as_comment() {
                    let text: &str = comment;
                    if let Some(comment) = collapse_comment(text) {
                        discoveries.push(Discovery::Comment(comment));
                    }
                }
            }
        }

        if self.capture_text_emails {
            let text = document.root_element().text().collect::<Vec<_>>().join(" ");
            for email in self.email_pattern.find_iter(&text) {
                discoveries.push(Discovery::Email(email.as_str().to_owned()));
            }
        }

        discoveries
    }

    fn discover_href(&self, href: &str, requested: &Url, effective: &Url) -> Option<Discovery> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        let lowered = href.to_ascii_lowercase();
        if lowered.starts_with("mailto:") {
            return mailto_address(href).map(Discovery::Email);
        }
        if lowered.starts_with("javascript:")
            || lowered.starts_with("tel:")
            || lowered.starts_with("data:")
        {
            return None;
        }

        let url = resolve(href, requested, effective)?;
        if is_truncated(&url, &self.truncated_extensions) {
            Some(resource_discovery(&url))
        } else {
            Some(Discovery::Page(canonicalize(&url)))
        }
    }
}

fn parse_selector(selector: &str) -> Result<Selector, CrawlError> {
    Selector::parse(selector).map_err(|e| {
        CrawlError::ParseError(format!("invalid selector '{}': {}", selector, e))
    })
}

fn resolve(href: &str, requested: &Url, effective: &Url) -> Option<Url> {
    let href = href.trim();
    let base = if href.starts_with('/') && !href.starts_with("//") {
        requested
    } else {
        effective
    };
    let url = absolute(base, href)?;
    match url.scheme() {
        "http" | "https" => Some(url),
        _ => None,
    }
}

fn resource_discovery(url: &Url) -> Discovery {
    Discovery::Resource {
        explorable: truncate_to_directory(url).to_string(),
        resource: canonicalize(url),
        kind: classify_resource(url),
    }
}

fn mailto_address(href: &str) -> Option<String> {
    let address = href.get("mailto:".len()..)?;
    let address = address.split('?').next().unwrap_or_default().trim();
    if address.contains('@') {
        Some(address.to_owned())
    } else {
        None
    }
}

/// `<!-- a \n  b -->` becomes `<!-- a b -->`; blank comments are dropped.
fn collapse_comment(text: &str) -> Option<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(format!("<!-- {} -->", collapsed))
    }
}
