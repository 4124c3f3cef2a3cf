//! # pagescope
//!
//! Command-line front end: scrape a list of URLs into annotated JSON,
//! analyse a single page, write a starter config, or print the effective
//! configuration.

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pagescope::{
    BatchCoordinator, BatchResult, Config, output::OutputWriter, telemetry::init_tracing,
};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

#[derive(Parser)]
#[command(author, version, about = "Fetch web pages, extract structured content and grade it", long_about = None)]
struct Cli {
    /// Configuration file (.toml or .json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scrape one or more URLs in order and write a batch report
    Scrape(ScrapeArgs),

    /// Scrape and analyse a single URL
    Analyze(AnalyzeArgs),

    /// Write a starter configuration file
    Init(InitArgs),

    /// Print the effective configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct ScrapeArgs {
    /// URLs to process
    #[arg(required = true)]
    urls: Vec<String>,

    /// Output directory (overrides output.directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip AI analysis even when an API key is configured
    #[arg(long)]
    no_ai: bool,

    /// Override a config value, e.g. --set scraper.maxRetries=5
    #[arg(long = "set", value_name = "SECTION.KEY=VALUE")]
    overrides: Vec<String>,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// URL to analyse
    url: String,

    /// Write the record to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip AI analysis even when an API key is configured
    #[arg(long)]
    no_ai: bool,

    /// Override a config value
    #[arg(long = "set", value_name = "SECTION.KEY=VALUE")]
    overrides: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Template {
    Default,
    Minimal,
}

#[derive(Args, Debug)]
struct InitArgs {
    /// Which template to write
    #[arg(long, value_enum, default_value_t = Template::Default)]
    template: Template,

    /// Where to write it
    #[arg(long, default_value = "pagescope.toml")]
    path: PathBuf,

    /// Replace an existing file
    #[arg(long)]
    force: bool,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Override a config value before printing
    #[arg(long = "set", value_name = "SECTION.KEY=VALUE")]
    overrides: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Scrape(args) => scrape_command(config_path, args).await,
        Commands::Analyze(args) => analyze_command(config_path, args).await,
        Commands::Init(args) => init_command(args),
        Commands::Config(args) => config_command(config_path, args),
    }
}

#[instrument(skip_all)]
async fn scrape_command(config_path: Option<&Path>, args: ScrapeArgs) -> anyhow::Result<()> {
    let mut config = Config::resolve(config_path, &args.overrides)?;
    if let Some(dir) = args.output {
        config.output.directory = dir;
    }

    let coordinator = BatchCoordinator::from_config(&config)?;
    if !args.no_ai && !coordinator.ai_available() {
        info!("AI analysis unavailable; continuing with extraction and scoring only");
    }

    let cancel = CancellationToken::new();
    let watcher = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; stopping after the current step");
            watcher.cancel();
        }
    });

    let result = coordinator
        .process_batch_until(&args.urls, !args.no_ai, &cancel)
        .await;

    let writer = OutputWriter::new(config.output.clone());
    let path = writer.save_batch(&result).await?;

    print_summary(&result);
    println!("Results saved to {}", path.display());
    Ok(())
}

#[instrument(skip_all, fields(url = %args.url))]
async fn analyze_command(config_path: Option<&Path>, args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = Config::resolve(config_path, &args.overrides)?;
    let coordinator = BatchCoordinator::from_config(&config)?;

    let annotated = coordinator
        .process_url(&args.url, !args.no_ai)
        .await
        .with_context(|| format!("Failed to process {}", args.url))?;

    let writer = OutputWriter::new(config.output.clone());
    match args.output {
        Some(path) => {
            writer.write(&path, &annotated).await?;
            println!("Record saved to {}", path.display());
        }
        None => {
            let body = if config.output.pretty_print {
                serde_json::to_string_pretty(&annotated)?
            } else {
                serde_json::to_string(&annotated)?
            };
            println!("{body}");
        }
    }
    Ok(())
}

fn init_command(args: InitArgs) -> anyhow::Result<()> {
    if args.path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        );
    }

    let body = match args.template {
        Template::Default => Config::default_template()?,
        Template::Minimal => Config::minimal_template().to_string(),
    };
    std::fs::write(&args.path, body)
        .with_context(|| format!("Failed to write {}", args.path.display()))?;

    println!("Wrote {:?} configuration to {}", args.template, args.path.display());
    Ok(())
}

fn config_command(config_path: Option<&Path>, args: ConfigArgs) -> anyhow::Result<()> {
    let config = Config::resolve(config_path, &args.overrides)?;
    let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;

    println!("{rendered}");
    let key_state = if config.ai.api_key.is_some() { "set" } else { "not set" };
    println!("# ai.apiKey is {key_state}");
    Ok(())
}

fn print_summary(result: &BatchResult) {
    let summary = &result.batch_summary;
    println!("Run {}", result.run_id);
    println!(
        "Processed {} URL(s): {} succeeded, {} failed{}",
        summary.total_processed,
        summary.successful_extractions,
        summary.total_processed - summary.successful_extractions,
        if result.cancelled { " (cancelled)" } else { "" }
    );
    println!(
        "Found {} image(s), {} video(s), {} link(s)",
        summary.total_images_found, summary.total_videos_found, summary.total_links_found
    );
    println!("Average quality score: {:.2}", summary.average_quality_score);
    if summary.ai_analysis_performed > 0 {
        println!("AI analysis performed: {}", summary.ai_analysis_performed);
    }

    for entry in &result.results {
        if let pagescope::BatchEntry::Failed { url, error } = entry {
            println!("  failed: {url}: {error}");
        }
    }
}
