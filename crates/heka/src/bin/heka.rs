// ABOUTME: CLI binary for Heka: extracts a news article from a URL or saved page and reports bias.
// ABOUTME: Prints the article text and bias report, or the annotated article as JSON.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;
use unbiased_heka::options::DEFAULT_ENDPOINT;
use unbiased_heka::resource::{fetch, load_file};
use unbiased_heka::{AnnotatedArticle, Article, Client, HekaError, Metadata, Options, SourceId};

const NO_TEXT: &str = "(No article text found)";
const ANALYSIS_FAILED: &str = "Failed to reach bias analysis.";

#[derive(Parser, Debug)]
#[command(name = "heka")]
#[command(about = "Extract a news article and flag biased paragraphs")]
struct Args {
    /// Article URL to fetch
    #[arg()]
    page: Option<String>,

    /// Saved HTML file to read instead of fetching
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// Source adapter: cbs, guardian or bbc (default: detected from the URL)
    #[arg(long = "source")]
    source: Option<SourceId>,

    /// Page URL used for source detection with --html
    #[arg(long = "url")]
    url: Option<String>,

    /// Bias service base URL
    #[arg(long = "endpoint", env = "HEKA_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Timeout in seconds for network requests
    #[arg(long = "timeout")]
    timeout: Option<u64>,

    /// Only extract; do not contact the bias service
    #[arg(long = "skip-analysis")]
    skip_analysis: bool,

    /// Output as JSON instead of text
    #[arg(long = "json")]
    json_output: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the page HTML and the URL it came from, if known.
async fn load_page(
    args: &Args,
    http: &reqwest::Client,
) -> Result<(String, Option<String>), HekaError> {
    if let Some(path) = &args.html {
        let html = load_file(path)?;
        return Ok((html, args.url.clone()));
    }

    let url = args.page.as_deref().unwrap_or_default();
    let fetched = fetch(http, url).await?;
    Ok((fetched.text(), Some(fetched.final_url)))
}

fn format_header(metadata: &Metadata) -> String {
    format!(
        "{}\nBy {}\nPublished: {}\n{}",
        metadata.title, metadata.author, metadata.date_published, metadata.description
    )
}

fn format_article(article: &Article) -> String {
    let body = if article.has_content() {
        article.plain_text()
    } else {
        NO_TEXT.to_string()
    };
    format!("{}\n\n{}", format_header(article.metadata()), body)
}

fn format_report(article: &Article, report: &AnnotatedArticle) -> String {
    format!(
        "{}\n\nBias analysis\n\n{}",
        format_article(article),
        report.format_text()
    )
}

fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    if args.html.is_none() && args.page.is_none() {
        eprintln!("error: an article URL or --html FILE is required");
        return ExitCode::from(1);
    }

    if args.html.is_some() && args.page.is_some() {
        eprintln!("error: cannot use both --html and a positional URL");
        return ExitCode::from(1);
    }

    let user_agent = Options::default().user_agent;
    let mut http = reqwest::Client::builder()
        .user_agent(&user_agent)
        .gzip(true)
        .brotli(true)
        .deflate(true);
    if let Some(secs) = args.timeout {
        http = http.timeout(Duration::from_secs(secs));
    }
    let http = match http.build() {
        Ok(http) => http,
        Err(e) => {
            eprintln!("error: failed to build HTTP client: {}", e);
            return ExitCode::from(1);
        }
    };

    let (html, page_url) = match load_page(&args, &http).await {
        Ok(page) => page,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    let source = args
        .source
        .or_else(|| page_url.as_deref().and_then(SourceId::detect));
    debug!(?source, ?page_url, "resolved source");

    let client = Client::builder()
        .endpoint(&args.endpoint)
        .user_agent(user_agent)
        .http_client(http)
        .build();

    let article = client.extract(&html, source);
    let rendered = if args.skip_analysis || !article.has_content() {
        if args.json_output {
            to_json(&article)
        } else {
            Ok(format_article(&article))
        }
    } else {
        match client.analyze_article(&article).await {
            Ok(report) if args.json_output => to_json(&report),
            Ok(report) => Ok(format_report(&article, &report)),
            Err(e) => {
                error!(error = %e, "bias analysis failed");
                eprintln!("{}", ANALYSIS_FAILED);
                return ExitCode::from(1);
            }
        }
    };

    let output_str = match rendered {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: failed to serialize output: {}", e);
            return ExitCode::from(1);
        }
    };

    if let Some(output_path) = &args.output {
        if let Err(e) = fs::write(output_path, &output_str) {
            eprintln!("error writing to {:?}: {}", output_path, e);
            return ExitCode::from(1);
        }
    } else {
        println!("{}", output_str);
    }

    ExitCode::SUCCESS
}
