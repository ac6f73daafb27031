mod echo;

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use spritsit_core::{
    CleanDocument, DEFAULT_REMOTE_API_URL, JsonConfig, RemoteConfig, Spritsit, SpritsitConfig, UrlType,
    convert_to_json, convert_to_text, fetch_file, fetch_stdin,
};
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::echo::{print_banner, print_document_details, print_info, print_step, print_success, print_timing, print_warning};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "txt" => Ok(Self::Text),
            _ => Err(format!("Invalid format: {}. Valid options: json, text", s)),
        }
    }
}

/// Turn a web page, e-book, or local HTML file into clean paragraph text
#[derive(Parser, Debug)]
#[command(name = "spritsit")]
#[command(version)]
#[command(about = "Turn web pages and e-books into clean, language-tagged text", long_about = None)]
struct Args {
    /// URL to fetch, local HTML/EPUB file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (json, text)
    #[arg(short, long, default_value = "json", value_name = "FORMAT")]
    format: OutputFormat,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,

    /// Words longer than this get soft hyphens
    #[arg(long, default_value = "24", value_name = "CHARS")]
    max_word_len: usize,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Remote reader API endpoint
    #[arg(long, env = "READABILITY_API_URL", default_value = DEFAULT_REMOTE_API_URL, value_name = "URL")]
    remote_url: String,

    /// Remote reader API token; without one only local extraction runs
    #[arg(long, env = "READABILITY_API_KEY", hide_env_values = true, value_name = "TOKEN")]
    remote_token: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Where the input comes from
enum Input<'a> {
    Stdin,
    Url(&'a str),
    File(&'a str),
}

impl<'a> Input<'a> {
    fn classify(input: &'a str) -> Self {
        if input == "-" {
            return Self::Stdin;
        }
        match Url::parse(input) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Url(input),
            _ => Self::File(input),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn build_config(args: &Args) -> SpritsitConfig {
    let mut builder = SpritsitConfig::builder().max_word_len(args.max_word_len).timeout(args.timeout);

    if let Some(user_agent) = &args.user_agent {
        builder = builder.user_agent(user_agent.clone());
    }
    if let Some(token) = &args.remote_token {
        builder = builder.remote(RemoteConfig::new(args.remote_url.clone(), token.clone()));
    }

    builder.build()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    let config = build_config(&args);
    let remote_enabled = config.remote.is_some();
    let spritsit = Spritsit::new(config).context("Failed to set up the pipeline")?;
    let started = Instant::now();

    let doc = match Input::classify(&args.input) {
        Input::Stdin => {
            if args.verbose {
                print_step(1, 3, "Reading from stdin");
            }
            let raw = fetch_stdin().context("Failed to read from stdin")?;
            spritsit
                .process_raw(CleanDocument::new("stdin"), raw)
                .context("Failed to extract content")?
        }
        Input::Url(url) => {
            if args.verbose {
                print_step(1, 3, &format!("Fetching {}", url.bright_white().underline()));
                if !remote_enabled {
                    print_warning("No remote token, using local extraction only");
                }
            }
            spritsit.extract(url).await.with_context(|| format!("Failed to extract {}", url))?
        }
        Input::File(path) => {
            if args.verbose {
                print_step(1, 3, &format!("Reading from file {}", path.bright_white()));
            }
            let raw = fetch_file(path).with_context(|| format!("Failed to read file: {}", path))?;
            spritsit
                .process_raw(CleanDocument::new(path), raw)
                .context("Failed to extract content")?
        }
    };

    if args.verbose {
        print_step(2, 3, "Normalized content");
        print_timing("Pipeline", started.elapsed());
        print_document_details(&doc);
        if doc.url_type() == UrlType::Pdf {
            print_warning("PDF sources are handed to the preprocessor");
        }
    }

    let output = match args.format {
        OutputFormat::Json => {
            let config = JsonConfig { pretty: args.pretty, callback: None };
            convert_to_json(&doc, &config).context("Failed to serialize document")?
        }
        OutputFormat::Text => convert_to_text(&doc),
    };

    if args.verbose {
        print_step(3, 3, "Writing output");
        eprintln!(
            "  {} {}",
            "Format:".dimmed(),
            format!("{:?}", args.format).bright_white()
        );
        eprintln!();
    }

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_classification() {
        assert!(matches!(Input::classify("-"), Input::Stdin));
        assert!(matches!(Input::classify("https://example.com/a"), Input::Url(_)));
        assert!(matches!(Input::classify("page.html"), Input::File(_)));
        assert!(matches!(Input::classify("/tmp/book.epub"), Input::File(_)));
        assert!(matches!(Input::classify("ftp://example.com/a"), Input::File(_)));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("txt").unwrap(), OutputFormat::Text);
        assert!(OutputFormat::from_str("markdown").is_err());
    }

    #[test]
    fn test_remote_needs_token() {
        let args = Args::parse_from(["spritsit", "page.html"]);
        let config = build_config(&args);
        assert_eq!(config.max_word_len, 24);
        assert!(config.remote.is_none() || std::env::var("READABILITY_API_KEY").is_ok());

        let args = Args::parse_from(["spritsit", "--remote-token", "abc", "--max-word-len", "10", "page.html"]);
        let config = build_config(&args);
        assert_eq!(config.max_word_len, 10);
        assert_eq!(config.remote.unwrap().token, "abc");
    }
}
