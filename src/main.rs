//! Site-Tap main entry point
//!
//! This is the command-line interface for the Site-Tap site mirror and
//! text extractor.

use anyhow::{Context, Result};
use clap::Parser;
use site_tap::config::{load_config_with_hash, Config};
use site_tap::output::SingerWriter;
use site_tap::Pipeline;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Tap: mirror a website and stream its text
///
/// Site-Tap crawls every same-origin page reachable from a root URL, saves
/// the HTML under an output folder, and emits the text selected from each
/// page as Singer RECORD messages.
#[derive(Parser, Debug)]
#[command(name = "site-tap")]
#[command(version)]
#[command(about = "Mirror a website and stream its text", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be done without crawling
    #[arg(long)]
    dry_run: bool,

    /// Process the existing mirror only, even if the config asks for a crawl
    #[arg(long)]
    no_crawl: bool,

    /// Write messages to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.no_crawl {
        config.tap.download_recursively = false;
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_run(config, cli.output).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout is reserved for the message stream.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_tap=info,warn"),
            1 => EnvFilter::new("site_tap=debug,info"),
            2 => EnvFilter::new("site_tap=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config) {
    println!("=== Site-Tap Dry Run ===\n");

    println!("Source:");
    println!("  Name: {}", config.tap.source_name);
    println!("  Site URL: {}", config.tap.site_url);
    println!("  Output folder: {}", config.tap.output_folder);
    println!("  Parser: {:?}", config.tap.parser);
    println!("  Crawl first: {}", config.tap.download_recursively);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Connect timeout: {}s", config.http.connect_timeout_secs);
    println!("  Max redirects: {}", config.http.max_redirects);

    println!("\nExtraction:");
    println!("  Selection: {:?}", config.extract.selection);
    println!("  Excluded tags: {}", config.extract.exclude_tags.join(", "));
    println!("  File extension: {}", config.extract.file_extension);

    println!("\n✓ Configuration is valid");
    if config.tap.download_recursively {
        println!("✓ Would mirror {} and extract every page", config.tap.site_url);
    } else {
        println!(
            "✓ Would extract existing *.{} files under {}",
            config.extract.file_extension, config.tap.output_folder
        );
    }
}

/// Handles the main run: crawl (if enabled), extract, emit messages
async fn handle_run(config: Config, output: Option<PathBuf>) -> Result<()> {
    let stream = config.tap.source_name.clone();
    let pipeline = Pipeline::new(config).context("Failed to build extraction rule")?;

    let records = pipeline
        .records()
        .await
        .context("Failed to collect documents")?;

    let sink: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut writer = SingerWriter::new(sink, stream);
    writer.write_schema()?;
    for record in records {
        let record = record.context("Failed to process document")?;
        writer.write_record(&record)?;
    }
    writer.flush()?;

    tracing::info!("Emitted {} records", writer.records_written());
    Ok(())
}
