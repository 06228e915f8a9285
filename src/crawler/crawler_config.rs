use crate::crawler::canonical::DEFAULT_TRUNCATED_EXTENSIONS;
use crate::crawler::crawl_error::CrawlError;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_THREAD_COUNT: usize = 10;
pub const DEFAULT_USER_AGENT: &str = concat!("rusty-recon/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    thread_count: usize,
    ssl_verify: bool,
    include_external: bool,
    print_comments: bool,
    print_emails: bool,
    extra_headers: Vec<(String, String)>,
    seed_endpoints: Vec<String>,
    output_path: Option<PathBuf>,
    request_timeout: Duration,
    user_agent: String,
    truncated_extensions: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            thread_count: DEFAULT_THREAD_COUNT,
            ssl_verify: true,
            include_external: false,
            print_comments: false,
            print_emails: false,
            extra_headers: Vec::new(),
            seed_endpoints: Vec::new(),
            output_path: None,
            request_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            truncated_extensions: DEFAULT_TRUNCATED_EXTENSIONS
                .iter()
                .map(|extension| extension.to_string())
                .collect(),
        }
    }
}

impl CrawlerConfig {
    pub fn with_thread_count(mut self, thread_count: usize) -> Self {
        self.thread_count = thread_count;
        self
    }

    pub fn with_ssl_verify(mut self, ssl_verify: bool) -> Self {
        self.ssl_verify = ssl_verify;
        self
    }

    pub fn with_include_external(mut self, include_external: bool) -> Self {
        self.include_external = include_external;
        self
    }

    pub fn with_print_comments(mut self, print_comments: bool) -> Self {
        self.print_comments = print_comments;
        self
    }

    pub fn with_print_emails(mut self, print_emails: bool) -> Self {
        self.print_emails = print_emails;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    pub fn with_seed_endpoints(mut self, seed_endpoints: Vec<String>) -> Self {
        self.seed_endpoints = seed_endpoints;
        self
    }

    pub fn with_output_path(mut self, output_path: Option<PathBuf>) -> Self {
        self.output_path = output_path;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_truncated_extensions(mut self, truncated_extensions: Vec<String>) -> Self {
        self.truncated_extensions = truncated_extensions;
        self
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    pub fn ssl_verify(&self) -> bool {
        self.ssl_verify
    }

    pub fn include_external(&self) -> bool {
        self.include_external
    }

    pub fn print_comments(&self) -> bool {
        self.print_comments
    }

    pub fn print_emails(&self) -> bool {
        self.print_emails
    }

    pub fn extra_headers(&self) -> &[(String, String)] {
        &self.extra_headers
    }

    pub fn seed_endpoints(&self) -> &[String] {
        &self.seed_endpoints
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn truncated_extensions(&self) -> &[String] {
        &self.truncated_extensions
    }
}

/// Splits a `Name: Value` header on its first colon.
pub fn parse_header(raw: &str) -> Result<(String, String), CrawlError> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_owned(), value.trim().to_owned()))
        }
        _ => Err(CrawlError::ConfigurationError(format!(
            "Header '{}' is not of the form 'Name: Value'",
            raw
        ))),
    }
}

/// Reads a gobuster-style endpoint list: the first token of every non-empty line.
pub fn parse_endpoints(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(|endpoint| endpoint.to_owned())
        .collect()
}

pub fn load_endpoints(path: &Path) -> Result<Vec<String>, CrawlError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CrawlError::ConfigurationError(format!(
            "Unable to read endpoint list {}: {}",
            path.display(),
            e
        ))
    })?;
    Ok(parse_endpoints(&content))
}
