//! Command-line interface for strip_colorscan
//!
//! Analyzes one or more strip photos and prints JSON to stdout. Logs go to
//! stderr so the output can be piped.
//!
//! Exit status: 0 on success, 1 when an image could not be loaded, 2 for
//! configuration and other failures.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process;
use tracing::Level;

use strip_colorscan::{
    analyze_batch, AnalysisError, ColorSpace, ErrorKind, ExtractionStrategy, PipelineConfig,
    StripAnalyzer,
};

#[derive(Parser, Debug)]
#[command(name = "strip-scan")]
#[command(about = "Read six-pad water test strips from photographs")]
struct Cli {
    /// Strip photographs to analyze
    #[arg(required_unless_present = "write_default_config")]
    images: Vec<PathBuf>,

    /// Water source label for fallback values ("Tap Water", "Lake/Pond", ...)
    #[arg(long)]
    source: Option<String>,

    /// JSON pipeline configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the matching color space
    #[arg(long, value_enum)]
    color_space: Option<SpaceArg>,

    /// Override the region extraction strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Apply gray-world white balance before extraction
    #[arg(long)]
    white_balance: bool,

    /// Write the default configuration to FILE and exit
    #[arg(long, value_name = "FILE")]
    write_default_config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SpaceArg {
    Lab,
    Rgb,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Auto,
    Contour,
    FixedPartition,
}

impl From<SpaceArg> for ColorSpace {
    fn from(arg: SpaceArg) -> Self {
        match arg {
            SpaceArg::Lab => ColorSpace::Lab,
            SpaceArg::Rgb => ColorSpace::Rgb,
        }
    }
}

impl From<StrategyArg> for ExtractionStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Auto => ExtractionStrategy::Auto,
            StrategyArg::Contour => ExtractionStrategy::Contour,
            StrategyArg::FixedPartition => ExtractionStrategy::FixedPartition,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    process::exit(match run(&cli) {
        Ok(code) => code,
        Err(error) => report_error(&error),
    });
}

fn run(cli: &Cli) -> Result<i32, AnalysisError> {
    if let Some(path) = &cli.write_default_config {
        PipelineConfig::default().to_json_file(path)?;
        eprintln!("Default configuration written to {}", path.display());
        return Ok(0);
    }

    let analyzer = StripAnalyzer::new(load_config(cli)?)?;
    let source = cli.source.as_deref();

    if let [image] = cli.images.as_slice() {
        let report = analyzer.analyze_path(image, source)?;
        print_json(&report)?;
        return Ok(0);
    }

    let entries = analyze_batch(&analyzer, cli.images.as_slice(), source);
    let records: Vec<_> = entries.iter().map(|e| e.to_record()).collect();
    print_json(&records)?;

    let code = entries
        .iter()
        .find_map(|e| e.outcome.as_ref().err())
        .map_or(0, |e| exit_code(e.kind()));
    Ok(code)
}

fn load_config(cli: &Cli) -> Result<PipelineConfig, AnalysisError> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(space) = cli.color_space {
        config.matching.color_space = space.into();
    }
    if let Some(strategy) = cli.strategy {
        config.extraction.strategy = strategy.into();
    }
    if cli.white_balance {
        config.preprocessing.white_balance = true;
    }
    Ok(config)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AnalysisError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AnalysisError::ProcessingError(format!("Output serialization failed: {e}")))?;
    println!("{json}");
    Ok(())
}

fn exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::ImageLoad => 1,
        _ => 2,
    }
}

fn report_error(error: &AnalysisError) -> i32 {
    tracing::error!("{error}");
    if error.is_recoverable() {
        eprintln!("Suggestion: {}", error.user_message());
    }
    if let Ok(json) = serde_json::to_string(&error.to_record()) {
        println!("{json}");
    }
    exit_code(error.kind())
}
