use anyhow::{Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use refmaker::config::{
    executable_dir, ConfigFile, ConfigProvider, EnvConfigProvider, CONFIG_FILE_NAME,
};
use refmaker::extractor::OpenAiExtractor;
use refmaker::pipeline::{Pipeline, RunSummary};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// refmaker - Build a BibTeX bibliography and a metadata report from a folder of PDFs
#[derive(Parser, Debug)]
#[command(name = "refmaker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract metadata, citations and summaries from PDF papers", long_about = None)]
struct Cli {
    /// Directory to scan recursively for PDFs (default: the directory containing this program)
    dir: Option<PathBuf>,

    /// Directory for output.txt and references.bib (default: the scanned directory)
    #[arg(long, short)]
    output_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model used for all completions
    #[arg(long)]
    model: Option<String>,

    /// Pages read from each PDF (0 reads every page)
    #[arg(long)]
    pages: Option<usize>,

    /// Write a default configuration file and exit
    #[arg(long)]
    init_config: bool,

    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.init_config {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(|| executable_dir().join(CONFIG_FILE_NAME));
        ConfigFile::create_default().save(&path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let provider = match &cli.config {
        Some(path) => EnvConfigProvider::with_config_file(path),
        None => EnvConfigProvider::new(),
    };
    let mut config = provider.load().context("Failed to load configuration")?;

    // Initialize tracing based on verbosity; logs go to stderr with the progress bar
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                log_filter(cli.verbose, cli.quiet, &config.logging.level)
            }),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(env_file) = provider.env_file() {
        tracing::debug!("Loaded environment from {}", env_file.display());
    }
    if let Some(config_path) = provider.config_file() {
        tracing::info!("Using config file: {}", config_path.display());
    }
    tracing::info!("Executable located at: {}", executable_dir().display());

    if let Some(dir) = cli.dir {
        config.pipeline.output_dir = dir.clone();
        config.pipeline.input_dir = dir;
    }
    if let Some(output_dir) = cli.output_dir {
        config.pipeline.output_dir = output_dir;
    }
    if let Some(model) = cli.model {
        config.openai.model = model;
    }
    if let Some(pages) = cli.pages {
        config.pipeline.metadata_pages = pages;
    }

    let extractor = OpenAiExtractor::new(&config.openai)?;
    tracing::debug!("Using model {}", extractor.model());

    let pipeline = Pipeline::from_provider(&config, extractor)?.show_progress(!cli.quiet);
    let summary = pipeline.run().await?;

    if !cli.quiet {
        print_summary(&summary, pipeline.config());
    }

    Ok(())
}

/// Default `EnvFilter` directive when `RUST_LOG` is unset
fn log_filter(verbose: u8, quiet: bool, configured: &str) -> String {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => configured,
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    format!("refmaker={}", level)
}

fn print_summary(summary: &RunSummary, config: &refmaker::config::PipelineConfig) {
    let color = std::io::stdout().is_terminal();
    let heading = "Processing complete!";

    println!();
    if color {
        println!("{}", heading.green().bold());
    } else {
        println!("{}", heading);
    }
    println!("Output saved to: {}", config.report_path().display());
    println!("Bibliography saved to: {}", config.bib_path().display());
    if summary.empty > 0 {
        println!("Files without extractable text: {}", summary.empty);
    }
    if summary.bib_errors > 0 {
        let line = format!("Entries that failed to generate: {}", summary.bib_errors);
        if color {
            println!("{}", line.yellow());
        } else {
            println!("{}", line);
        }
    }
    println!("Processed {} PDF files.", summary.processed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter() {
        assert_eq!(log_filter(0, false, "info"), "refmaker=info");
        assert_eq!(log_filter(0, false, "warn"), "refmaker=warn");
        assert_eq!(log_filter(1, false, "warn"), "refmaker=debug");
        assert_eq!(log_filter(3, false, "info"), "refmaker=trace");
        assert_eq!(log_filter(2, true, "info"), "refmaker=error");
    }

    #[test]
    fn test_cli_parses_overrides() {
        let cli = Cli::parse_from(["refmaker", "papers", "-o", "out", "--pages", "0", "-vv"]);
        assert_eq!(cli.dir, Some(PathBuf::from("papers")));
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        assert_eq!(cli.pages, Some(0));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }
}
