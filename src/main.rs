use anyhow::Context;
use clap::Parser;
use rusty_recon::console::{ConsoleProgressReporter, print_report};
use rusty_recon::crawler::SeedCrawler;
use rusty_recon::crawler::canonical::parse_seed;
use rusty_recon::crawler::crawler_config::{
    CrawlerConfig, DEFAULT_THREAD_COUNT, load_endpoints, parse_header,
};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Crawls a site and reports what it exposes", long_about = None)]
struct CommandLineArgs {
    /// URL to start crawling from; everything under its directory is in scope
    #[arg(short = 'u', long = "url", value_name = "URL")]
    url: String,

    /// Gobuster output with endpoints to seed the crawl with
    #[arg(short = 'L', long = "endpoints", value_name = "FILE")]
    endpoints: Option<PathBuf>,

    /// Skip TLS certificate verification
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Extra request header, e.g. "Cookie: session=abc"
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
    headers: Vec<String>,

    /// Number of concurrent workers
    #[arg(short = 't', long, default_value_t = DEFAULT_THREAD_COUNT)]
    threads: usize,

    /// List links that leave the crawl scope
    #[arg(long)]
    external: bool,

    /// List HTML comments
    #[arg(long)]
    comments: bool,

    /// List email addresses
    #[arg(long)]
    emails: bool,

    /// Save the report as JSON
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Show every request (-v) and debug logs (-vv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "rusty_recon=warn",
        1 => "rusty_recon=info",
        _ => "rusty_recon=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(args: &CommandLineArgs) -> anyhow::Result<CrawlerConfig> {
    let mut crawler_config = CrawlerConfig::default()
        .with_thread_count(args.threads)
        .with_ssl_verify(!args.insecure)
        .with_include_external(args.external)
        .with_print_comments(args.comments)
        .with_print_emails(args.emails)
        .with_output_path(args.output.clone())
        .with_request_timeout(Duration::from_secs(args.timeout));

    for raw_header in &args.headers {
        let (name, value) = parse_header(raw_header)?;
        crawler_config = crawler_config.with_header(name, value);
    }
    if let Some(endpoints_path) = &args.endpoints {
        let endpoints = load_endpoints(endpoints_path).with_context(|| {
            format!("Unable to read endpoints from {}", endpoints_path.display())
        })?;
        crawler_config = crawler_config.with_seed_endpoints(endpoints);
    }
    Ok(crawler_config)
}

async fn main_impl(args: &CommandLineArgs) -> anyhow::Result<()> {
    let crawler_config = build_config(args)?;
    let seed_url = parse_seed(&args.url)?;

    let shutdown_notify = Arc::new(tokio::sync::Notify::new());
    {
        let shutdown_notify = Arc::clone(&shutdown_notify);
        ctrlc::set_handler(move || {
            eprintln!("Received Ctrl+C, stopping the crawl...");
            shutdown_notify.notify_one();
        })?;
    }

    let progress_reporter = ConsoleProgressReporter::new(args.verbose > 0);
    let seed_crawler = SeedCrawler::new(shutdown_notify, seed_url, progress_reporter);
    let crawl_result = seed_crawler
        .crawl(&crawler_config)
        .await
        .with_context(|| format!("Crawl of {} failed", seed_crawler.seed()))?;

    print_report(&crawl_result, &crawler_config)?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = CommandLineArgs::parse();
    init_logging(args.verbose);

    if let Err(e) = main_impl(&args).await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
