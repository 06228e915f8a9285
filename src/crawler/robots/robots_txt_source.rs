use crate::crawler::crawl_error::CrawlError;
use crate::crawler::robots::robots_txt_view::RobotsTxtView;
use regex::Regex;
use reqwest::StatusCode;
use robots_txt::Robots;
use tracing::debug;
use url::Url;

const ENDPOINT_PATTERN: &str = r"/[a-zA-Z0-9_\-/.]+";

/// A robots.txt file fetched from the crawl root.
#[derive(Clone)]
pub struct RobotsTxtSource {
    url: Url,
    content: String,
    agent: String,
}

impl RobotsTxtSource {
    /// Fetches `<root>robots.txt`. Anything but a 200 means there is no file to use.
    pub async fn load_from_root(
        client: &reqwest::Client,
        root: &Url,
        agent: &str,
    ) -> Result<Option<Self>, CrawlError> {
        let robots_txt_url = root.join("robots.txt")?;
        let robots_response = client.get(robots_txt_url.clone()).send().await?;
        if robots_response.status() != StatusCode::OK {
            debug!(
                "File 'robots.txt' not found (code={})",
                robots_response.status().as_u16()
            );
            return Ok(None);
        }
        let content = robots_response.text().await?;
        Ok(Some(Self::from_content(robots_txt_url, content, agent)))
    }

    pub fn from_content(url: Url, content: String, agent: &str) -> Self {
        Self {
            url,
            content,
            agent: agent.to_owned(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Every path-looking token in the file, in order of appearance, without duplicates.
    pub fn endpoints(&self) -> Result<Vec<String>, CrawlError> {
        let pattern = Regex::new(ENDPOINT_PATTERN)?;
        let mut endpoints: Vec<String> = Vec::new();
        for found in pattern.find_iter(&self.content) {
            let endpoint = found.as_str().trim();
            if endpoint != "/" && !endpoints.iter().any(|known| known == endpoint) {
                endpoints.push(endpoint.to_owned());
            }
        }
        Ok(endpoints)
    }

    pub fn view(&self) -> RobotsTxtView<'_> {
        let robot = Robots::from_str_lossy(self.content.as_str());
        RobotsTxtView::new(robot, self.agent.clone())
    }
}
