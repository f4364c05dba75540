//! Command-line interface components.

use crate::config::{CompressionAlgorithm, ProcessorConfig, TableSelection};
use crate::models::{EventSource, ProcessingStats, SourceType};
use crate::processor::ArchiveProcessor;
use crate::source::{ArchiveSource, DirectoryCache, default_cache_dir};

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "retrosheet")]
#[command(about = "Convert Retrosheet event files to Parquet tables")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Years to process, e.g. 2023 or 2019-2021
    #[arg(value_name = "YEARS")]
    pub years: Vec<String>,

    /// Process every archive found in the cache
    #[arg(long, conflicts_with = "years")]
    pub all: bool,

    /// Archive categories (season, all-star, post-season)
    #[arg(short, long, value_delimiter = ',', default_value = "season")]
    pub category: Vec<SourceType>,

    /// Directory of extracted archives (default: user data dir)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Output directory for Parquet files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long, default_value = "snappy")]
    pub compression: String,

    /// Tables to write (metadata, plays, lineups, data)
    #[arg(long, default_value = "metadata,plays,lineups,data")]
    pub tables: String,

    /// Maximum event files parsed concurrently
    #[arg(long)]
    pub max_concurrent: Option<usize>,

    /// Leave out files with any decode error
    #[arg(long)]
    pub strict: bool,

    /// Parse and report without writing output
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    /// Get the output path, defaulting to a `parquet` directory beside the cache
    pub fn get_output_dir(&self, cache_dir: &Path) -> PathBuf {
        match &self.output_dir {
            Some(path) => path.clone(),
            None => cache_dir
                .parent()
                .unwrap_or(cache_dir)
                .join("parquet"),
        }
    }

    pub fn build_config(&self) -> Result<ProcessorConfig> {
        let compression: CompressionAlgorithm = self.compression.parse()?;
        let tables = TableSelection::parse_list(&self.tables)?;

        let mut config = ProcessorConfig::default()
            .with_compression(compression)
            .with_tables(tables);
        if let Some(max) = self.max_concurrent {
            config = config.with_max_concurrent_files(max);
        }
        if self.strict {
            config = config.with_strict_decoding();
        }
        if self.dry_run {
            config = config.with_dry_run();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Parse `2023` or `2019-2021` into a list of years
pub fn parse_years(args: &[String]) -> Result<Vec<i32>> {
    let mut years = Vec::new();
    for arg in args {
        match arg.split_once('-') {
            Some((start, end)) => {
                let start: i32 = start
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid start year in '{}'", arg))?;
                let end: i32 = end
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid end year in '{}'", arg))?;
                if end < start {
                    anyhow::bail!("Year range '{}' is reversed", arg);
                }
                years.extend(start..=end);
            }
            None => years.push(
                arg.trim()
                    .parse()
                    .with_context(|| format!("Invalid year '{}'", arg))?,
            ),
        }
    }
    years.sort_unstable();
    years.dedup();
    Ok(years)
}

/// Set up structured logging
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("retrosheet_processor={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Run the command described by `args`
pub async fn run(args: Args) -> Result<ProcessingStats> {
    let cache_dir = match &args.cache_dir {
        Some(dir) => dir.clone(),
        None => default_cache_dir().context("Could not determine user data directory")?,
    };
    let cache = DirectoryCache::new(&cache_dir)
        .with_context(|| format!("Failed to open cache at {}", cache_dir.display()))?;

    let requests: Vec<EventSource> = if args.all {
        cache
            .available()
            .into_iter()
            .filter(|source| args.category.contains(&source.source_type))
            .collect()
    } else {
        if args.years.is_empty() {
            anyhow::bail!("No years given. Pass years such as 2023 or 2019-2021, or use --all");
        }
        let years = parse_years(&args.years)?;
        years
            .iter()
            .flat_map(|&year| {
                args.category
                    .iter()
                    .map(move |&source_type| EventSource::new(year, source_type))
            })
            .collect()
    };

    if requests.is_empty() {
        anyhow::bail!(
            "No cached archives found in {}. Extract archives such as {} there first.",
            cache_dir.display(),
            SourceType::Season.archive_stem(2023)
        );
    }

    let config = args.build_config()?;
    let output_dir = args.get_output_dir(&cache_dir);
    debug!(
        "Processing {} archives into {}",
        requests.len(),
        output_dir.display()
    );

    let processor = ArchiveProcessor::new(ArchiveSource::new(cache), output_dir).with_config(config);
    let stats = processor.process(&requests).await?;
    Ok(stats)
}
