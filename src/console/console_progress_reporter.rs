use crate::crawler::crawler_progress_event::CrawlerProgressEvent;
use crate::crawler::progress_reporter::ProgressReporter;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use std::io::{Write, stdout};

/// Prints one colored status line per crawl event.
///
/// Without `verbose`, only the start, the end and fatal errors are shown.
#[derive(Debug, Clone, Default)]
pub struct ConsoleProgressReporter {
    verbose: bool,
}

impl ConsoleProgressReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn print_line(&self, color: Color, marker: &str, message: &str) {
        let mut stdout = stdout().lock();
        let _ = queue!(
            stdout,
            SetForegroundColor(color),
            SetAttribute(Attribute::Bold),
            Print(marker),
            Print(" "),
            Print(message),
            SetAttribute(Attribute::Reset),
            ResetColor,
            Print("\n"),
        );
        let _ = stdout.flush();
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn report(&self, event: CrawlerProgressEvent) {
        match event {
            CrawlerProgressEvent::Begin { seed, root } => self.print_line(
                Color::Blue,
                "[*]",
                &format!("Crawling {} (scope: {})", seed, root),
            ),
            CrawlerProgressEvent::Unreachable { url, reason } => self.print_line(
                Color::Red,
                "[ERROR]",
                &format!("Could not send request to {}, reason={}", url, reason),
            ),
            CrawlerProgressEvent::End { num_pages, aborted } => {
                if aborted {
                    self.print_line(
                        Color::Red,
                        "[*]",
                        &format!("Crawl aborted after finding {} URLs.", num_pages),
                    )
                } else {
                    self.print_line(
                        Color::Blue,
                        "[*]",
                        &format!("Crawl complete, found {} URLs.", num_pages),
                    )
                }
            }
            _ if !self.verbose => {}
            CrawlerProgressEvent::RobotsTxtFound { url } => {
                self.print_line(Color::Blue, "[+]", &format!("Found robots.txt file at {}.", url))
            }
            CrawlerProgressEvent::RobotsTxtEndpoint { url, disallowed } => {
                let suffix = if disallowed { " (disallowed)" } else { "" };
                self.print_line(
                    Color::Blue,
                    "[+]",
                    &format!("Added {} from robots.txt{}.", url, suffix),
                )
            }
            CrawlerProgressEvent::Crawled { url } => {
                self.print_line(Color::Green, "[+]", &format!("Crawl {}", url))
            }
            CrawlerProgressEvent::Redirected { from, to } => {
                self.print_line(Color::Blue, "[>]", &format!("Crawl {} => Crawl {}", from, to))
            }
            CrawlerProgressEvent::AlreadyCrawled { from, to } => self.print_line(
                Color::Yellow,
                "[x]",
                &format!("Crawl {} => {} already crawled.", from, to),
            ),
            CrawlerProgressEvent::HttpError { url, status_code } => self.print_line(
                Color::Red,
                "[-]",
                &format!("[{}] Unable to access {}", status_code, url),
            ),
            CrawlerProgressEvent::RequestFailed { url, reason } => self.print_line(
                Color::Red,
                "[-]",
                &format!("Request to {} failed: {}", url, reason),
            ),
            CrawlerProgressEvent::NotHtml { url, content_type } => self.print_line(
                Color::DarkGrey,
                "[~]",
                &format!("Not parsing {} ({})", url, content_type),
            ),
        }
    }
}
