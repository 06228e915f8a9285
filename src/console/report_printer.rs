use crate::crawler::crawl_result::{CrawlResult, is_suspicious};
use crate::crawler::crawler_config::CrawlerConfig;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use std::io::{self, Write, stdout};

pub fn print_report(result: &CrawlResult, config: &CrawlerConfig) -> io::Result<()> {
    let mut stdout = stdout().lock();
    write_report(&mut stdout, result, config)?;
    stdout.flush()
}

/// Renders the final report. Comments and emails are only listed when the
/// matching config flag is set.
pub fn write_report<W: Write>(
    out: &mut W,
    result: &CrawlResult,
    config: &CrawlerConfig,
) -> io::Result<()> {
    heading(out, &format!("Found {} URLs.", result.pages.len()))?;
    for page in &result.pages {
        if is_suspicious(page) {
            line(out, Color::Yellow, "[!]", &format!("Found suspicious URL {}", page))?;
        } else {
            line(out, Color::Green, "[*]", &format!("Found URL {}", page))?;
        }
    }

    for (kind, urls) in &result.resources {
        if urls.is_empty() {
            continue;
        }
        heading(out, &format!("Found {} {} resources.", urls.len(), kind))?;
        for url in urls {
            line(out, Color::Green, "[*]", url)?;
        }
    }

    if !result.external.is_empty() {
        heading(out, &format!("Found {} external URLs.", result.external.len()))?;
        for url in &result.external {
            line(out, Color::DarkGrey, "[*]", url)?;
        }
    }

    if config.print_comments() {
        heading(out, &format!("Found {} comments.", result.comments.len()))?;
        for comment in &result.comments {
            line(out, Color::Magenta, "[*]", comment.trim())?;
        }
    }

    if config.print_emails() {
        heading(out, &format!("Found {} emails.", result.emails.len()))?;
        for email in &result.emails {
            line(out, Color::Cyan, "[*]", email)?;
        }
    }

    if result.aborted {
        line(
            out,
            Color::Red,
            "[!]",
            "The target stopped responding, this report is partial.",
        )?;
    }
    if let Some(output_path) = config.output_path() {
        heading(out, &format!("Report saved to {}", output_path.display()))?;
    }
    Ok(())
}

fn heading<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    line(out, Color::Blue, "[*]", message)
}

fn line<W: Write>(out: &mut W, color: Color, marker: &str, message: &str) -> io::Result<()> {
    queue!(
        out,
        SetForegroundColor(color),
        SetAttribute(Attribute::Bold),
        Print(marker),
        SetAttribute(Attribute::Reset),
        SetForegroundColor(color),
        Print(" "),
        Print(message),
        ResetColor,
        Print("\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::canonical::ResourceKind;

    fn render(result: &CrawlResult, config: &CrawlerConfig) -> String {
        let mut out = Vec::new();
        write_report(&mut out, result, config).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn sample() -> CrawlResult {
        let mut result = CrawlResult {
            pages: vec![
                "https://example.com/".to_owned(),
                "https://example.com/api/export".to_owned(),
            ],
            comments: vec![" TODO remove debug ".to_owned()],
            emails: vec!["john@doe.com".to_owned()],
            ..CrawlResult::default()
        };
        result.resources.insert(
            ResourceKind::Image,
            vec!["https://example.com/logo.png".to_owned()],
        );
        result
    }

    #[test]
    fn suspicious_pages_are_flagged() {
        let report = render(&sample(), &CrawlerConfig::default());
        assert!(report.contains("Found 2 URLs."));
        assert!(report.contains("Found URL https://example.com/"));
        assert!(report.contains("Found suspicious URL https://example.com/api/export"));
        assert!(report.contains("Found 1 images resources."));
    }

    #[test]
    fn comments_and_emails_follow_the_flags() {
        let quiet = render(&sample(), &CrawlerConfig::default());
        assert!(!quiet.contains("john@doe.com"));
        assert!(!quiet.contains("TODO remove debug"));

        let config = CrawlerConfig::default()
            .with_print_comments(true)
            .with_print_emails(true);
        let verbose = render(&sample(), &config);
        assert!(verbose.contains("Found 1 emails."));
        assert!(verbose.contains("john@doe.com"));
        assert!(verbose.contains("TODO remove debug"));
    }
}
