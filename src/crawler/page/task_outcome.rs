use crate::crawler::canonical::canonicalize;
use crate::crawler::crawl_error::CrawlError;
use crate::crawler::page::page_crawler::FetchedPage;

/// How a single fetch ended, before any extraction happens.
#[derive(Debug)]
pub enum TaskOutcome {
    Fetched(FetchedPage),
    Redirected {
        requested: String,
        page: FetchedPage,
    },
    HttpError {
        url: String,
        status_code: u16,
    },
    TransportError {
        url: String,
        error: CrawlError,
    },
    NotHtml {
        url: String,
        content_type: String,
    },
    /// The request failed in a way that only concerns this URL (redirect loop,
    /// truncated body).
    RequestFailed {
        url: String,
        error: CrawlError,
    },
}

impl TaskOutcome {
    pub fn from_fetch(requested: &str, fetched: Result<FetchedPage, CrawlError>) -> Self {
        match fetched {
            Ok(page) => {
                if canonicalize(&page.url) != requested {
                    TaskOutcome::Redirected {
                        requested: requested.to_owned(),
                        page,
                    }
                } else if !page.is_html {
                    TaskOutcome::NotHtml {
                        url: requested.to_owned(),
                        content_type: page.content_type,
                    }
                } else {
                    TaskOutcome::Fetched(page)
                }
            }
            Err(CrawlError::HttpError(status_code)) => TaskOutcome::HttpError {
                url: requested.to_owned(),
                status_code,
            },
            Err(error) if error.is_fatal_for_target() => TaskOutcome::TransportError {
                url: requested.to_owned(),
                error,
            },
            Err(error) => TaskOutcome::RequestFailed {
                url: requested.to_owned(),
                error,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn page(url: &str, is_html: bool) -> FetchedPage {
        FetchedPage {
            url: Url::parse(url).unwrap(),
            status_code: 200,
            content_type: if is_html { "text/html" } else { "image/png" }.to_owned(),
            is_html,
            body: String::new(),
        }
    }

    #[test]
    fn same_url_html_is_fetched() {
        let outcome = TaskOutcome::from_fetch(
            "https://example.com/a",
            Ok(page("https://example.com/a#frag", true)),
        );
        assert!(matches!(outcome, TaskOutcome::Fetched(_)));
    }

    #[test]
    fn different_effective_url_is_a_redirect() {
        let outcome = TaskOutcome::from_fetch(
            "https://example.com/old",
            Ok(page("https://example.com/new", false)),
        );
        match outcome {
            TaskOutcome::Redirected { requested, page } => {
                assert_eq!(requested, "https://example.com/old");
                assert_eq!(page.url.as_str(), "https://example.com/new");
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn errors_map_to_outcomes() {
        let outcome =
            TaskOutcome::from_fetch("https://example.com/x", Err(CrawlError::HttpError(404)));
        assert!(matches!(outcome, TaskOutcome::HttpError { status_code: 404, .. }));

        let outcome = TaskOutcome::from_fetch(
            "https://example.com/x",
            Ok(page("https://example.com/x", false)),
        );
        assert!(matches!(outcome, TaskOutcome::NotHtml { .. }));
    }

    #[test]
    fn url_local_errors_do_not_become_transport_errors() {
        let outcome = TaskOutcome::from_fetch(
            "https://example.com/x",
            Err(CrawlError::ParseError("truncated body".to_owned())),
        );
        match outcome {
            TaskOutcome::RequestFailed { url, .. } => assert_eq!(url, "https://example.com/x"),
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}
