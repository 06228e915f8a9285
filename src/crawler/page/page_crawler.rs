use crate::crawler::crawl_error::CrawlError;
use crate::crawler::crawler_config::CrawlerConfig;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

const MAX_REDIRECTS: usize = 10;

/// A successful (200) response. `url` is where the client ended up after redirects.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: Url,
    pub status_code: u16,
    pub content_type: String,
    pub is_html: bool,
    /// Empty unless the response is HTML.
    pub body: String,
}

#[derive(Clone)]
pub struct PageCrawler {
    client: reqwest::Client,
}

impl PageCrawler {
    pub fn new(config: &CrawlerConfig) -> Result<Self, CrawlError> {
        let mut headers = HeaderMap::new();
        for (name, value) in config.extra_headers() {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                CrawlError::ConfigurationError(format!("Invalid header name '{}': {}", name, e))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                CrawlError::ConfigurationError(format!("Invalid value for header '{}': {}", name, e))
            })?;
            headers.append(header_name, header_value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent())
            .timeout(config.request_timeout())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .danger_accept_invalid_certs(!config.ssl_verify())
            .build()
            .map_err(|e| {
                CrawlError::ConfigurationError(format!("Unable to build HTTP client: {}", e))
            })?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub async fn crawl(&self, url: &Url) -> Result<FetchedPage, CrawlError> {
        let crawl_response = self.client.get(url.clone()).send().await?;
        if crawl_response.status() != StatusCode::OK {
            return Err(CrawlError::HttpError(crawl_response.status().as_u16()));
        }
        let status_code = crawl_response.status().as_u16();
        let effective_url = crawl_response.url().clone();

        let content_type = crawl_response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        let is_html = match content_type.parse::<mime::Mime>() {
            Ok(mime_type) => mime_type.type_() == mime::TEXT && mime_type.subtype() == mime::HTML,
            Err(_) => false,
        };

        let body = if is_html {
            crawl_response.text().await?
        } else {
            String::new()
        };

        Ok(FetchedPage {
            url: effective_url,
            status_code,
            content_type,
            is_html,
            body,
        })
    }
}
