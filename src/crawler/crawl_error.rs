#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error("HTTP Error Status Code = {0}")]
    HttpError(u16),

    #[error("Request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Invalid seed URL '{url}': {source}")]
    InvalidSeed {
        url: String,
        source: url::ParseError,
    },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Unable to parse document: {0}")]
    ParseError(String),

    #[error(transparent)]
    UrlParseError(#[from] url::ParseError),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    RegexError(#[from] regex::Error),
}

impl CrawlError {
    /// Whether this error means the whole target is gone rather than one bad link.
    /// Only connection failures (TLS included) and timeouts qualify; redirect loops
    /// and broken bodies stay local to the URL that produced them.
    pub fn is_fatal_for_target(&self) -> bool {
        match self {
            CrawlError::TransportError(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}
