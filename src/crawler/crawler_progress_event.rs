use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlerProgressEvent {
    Begin {
        seed: Url,
        root: Url,
    },
    RobotsTxtFound {
        url: String,
    },
    RobotsTxtEndpoint {
        url: String,
        disallowed: bool,
    },
    Crawled {
        url: String,
    },
    Redirected {
        from: String,
        to: String,
    },
    AlreadyCrawled {
        from: String,
        to: String,
    },
    HttpError {
        url: String,
        status_code: u16,
    },
    NotHtml {
        url: String,
        content_type: String,
    },
    RequestFailed {
        url: String,
        reason: String,
    },
    Unreachable {
        url: String,
        reason: String,
    },
    End {
        num_pages: usize,
        aborted: bool,
    },
}
