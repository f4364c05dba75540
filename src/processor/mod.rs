//! Main processing engine.
//!
//! Orchestrates the workflow for each requested archive: retrieval from the
//! cache (or fetcher), concurrent per-file parsing, table projection and
//! Parquet output.

pub mod parse;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use self::parse::{ParsedFile, parse_event_file};
use self::writer::TableWriter;

use crate::config::{ProcessorConfig, TableSelection};
use crate::constants::tables;
use crate::decoders::DecodedBatch;
use crate::error::{Result, RetroError};
use crate::models::{EventFile, EventSource, ProcessingStats};
use crate::projection::{project_data, project_lineups, project_metadata, project_plays};
use crate::source::ArchiveSource;

use colored::*;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use polars::functions::concat_df_diagonal;
use polars::prelude::DataFrame;
use std::path::PathBuf;
use std::time::Instant;
use tokio::task;
use tracing::{debug, error, warn};

/// Projected tables for one archive
#[derive(Debug, Default)]
pub struct ArchiveTables {
    pub metadata: Option<DataFrame>,
    pub plays: Option<DataFrame>,
    pub lineups: Option<DataFrame>,
    pub data: Option<DataFrame>,
}

impl ArchiveTables {
    /// Project the selected tables from parsed files, in the given file order.
    ///
    /// Each file is projected on its own and the frames stacked, so rows
    /// never regroup across files. Metadata columns are the union over all
    /// files; a file without a given column gets nulls.
    pub fn project(files: &[ParsedFile], selection: &TableSelection) -> Result<Self> {
        Ok(Self {
            metadata: selection
                .metadata
                .then(|| stack(files, |batch| project_metadata(&batch.info_records())))
                .transpose()?,
            plays: selection
                .plays
                .then(|| stack(files, |batch| project_plays(&batch.play_records())))
                .transpose()?,
            lineups: selection
                .lineups
                .then(|| stack(files, |batch| project_lineups(&batch.lineup_records())))
                .transpose()?,
            data: selection
                .data
                .then(|| stack(files, |batch| project_data(&batch.data_records())))
                .transpose()?,
        })
    }

    fn into_named(self) -> Vec<(&'static str, DataFrame)> {
        [
            (tables::METADATA, self.metadata),
            (tables::PLAYS, self.plays),
            (tables::LINEUPS, self.lineups),
            (tables::DATA, self.data),
        ]
        .into_iter()
        .filter_map(|(name, df)| df.map(|df| (name, df)))
        .collect()
    }
}

fn stack<F>(files: &[ParsedFile], project: F) -> Result<DataFrame>
where
    F: Fn(&DecodedBatch) -> Result<DataFrame>,
{
    if files.is_empty() {
        return project(&DecodedBatch::default());
    }
    let frames = files
        .iter()
        .map(|file| project(&file.batch))
        .collect::<Result<Vec<_>>>()?;
    Ok(concat_df_diagonal(&frames)?)
}

/// Main processor for converting cached archives to Parquet tables
#[derive(Debug)]
pub struct ArchiveProcessor {
    source: ArchiveSource,
    writer: TableWriter,
    config: ProcessorConfig,
}

impl ArchiveProcessor {
    pub fn new(source: ArchiveSource, output_dir: PathBuf) -> Self {
        let config = ProcessorConfig::default();
        Self {
            source,
            writer: TableWriter::new(output_dir, config.compression),
            config,
        }
    }

    /// Configure the processor
    pub fn with_config(mut self, config: ProcessorConfig) -> Self {
        self.writer = TableWriter::new(self.writer.output_dir().to_path_buf(), config.compression);
        self.config = config;
        self
    }

    /// Process every requested archive in order
    pub async fn process(&self, requests: &[EventSource]) -> Result<ProcessingStats> {
        self.config.validate()?;
        let start_time = Instant::now();
        println!(
            "{}",
            "Starting Retrosheet event processing".bright_green().bold()
        );
        println!(
            "  {} {}",
            "Output:".bright_cyan(),
            self.writer.output_dir().display()
        );

        let mut stats = ProcessingStats::default();
        for request in requests {
            let archive_stats = self.process_archive(*request).await?;
            stats.merge(archive_stats);
        }
        stats.processing_time_ms = start_time.elapsed().as_millis();

        print_summary(&stats);
        Ok(stats)
    }

    /// Retrieve, parse, project and write one archive.
    ///
    /// Retrieval failures are counted, not propagated, so that one missing
    /// year doesn't stop a multi-year run.
    pub async fn process_archive(&self, request: EventSource) -> Result<ProcessingStats> {
        let stem = request.source_type.archive_stem(request.year);
        let mut stats = ProcessingStats {
            archives_requested: 1,
            ..Default::default()
        };

        println!(
            "\n{} {} ({})",
            "Archive".bright_yellow(),
            stem.bright_white().bold(),
            request.source_type
        );

        let files = match self.retrieve(request).await {
            Ok(files) => files,
            Err(e) => {
                error!("Could not retrieve {}: {}", stem, e);
                stats.archives_unavailable = 1;
                return Ok(stats);
            }
        };

        if files.is_empty() {
            warn!("Archive {} contains no event files", stem);
            stats.archives_empty = 1;
            return Ok(stats);
        }

        let (parsed, failed) = self.parse_files(files, request).await;
        stats.files_failed = failed;

        let mut kept = Vec::with_capacity(parsed.len());
        for file in parsed {
            stats.decode_errors += file.errors().len();
            stats.orphan_records += file.orphan_count();
            if self.config.fail_on_decode_errors && !file.errors().is_empty() {
                warn!(
                    "Excluding {}: {} decode errors in strict mode",
                    file.name,
                    file.errors().len()
                );
                stats.files_failed += 1;
                continue;
            }
            stats.games += file.game_count();
            stats.plays += file.play_count();
            kept.push(file);
        }
        stats.files_processed = kept.len();

        if self.config.dry_run || kept.is_empty() {
            return Ok(stats);
        }

        let selection = self.config.tables;
        let writer = self.writer.clone();
        let written = task::spawn_blocking(move || -> Result<Vec<PathBuf>> {
            let tables = ArchiveTables::project(&kept, &selection)?;
            tables
                .into_named()
                .into_iter()
                .map(|(table, df)| writer.write_table(df, &stem, table))
                .collect()
        })
        .await
        .map_err(|e| RetroError::ProcessingFailed {
            path: self.writer.output_dir().to_path_buf(),
            reason: format!("Table writing task failed: {}", e),
        })??;

        stats.output_paths = written;
        Ok(stats)
    }

    async fn retrieve(&self, request: EventSource) -> Result<Vec<EventFile>> {
        let source = self.source.clone();
        task::spawn_blocking(move || source.retrieve(request.year, request.source_type))
            .await
            .map_err(|e| {
                RetroError::retrieval(
                    request.year,
                    request.source_type,
                    format!("retrieval task failed: {}", e),
                )
            })?
    }

    /// Parse files concurrently; results come back in input order
    async fn parse_files(
        &self,
        files: Vec<EventFile>,
        source: EventSource,
    ) -> (Vec<ParsedFile>, usize) {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message("Parsing event files");

        let concurrent_limit = self.config.max_concurrent_files.min(files.len()).max(1);
        debug!(
            "Parsing {} files with concurrency {}",
            files.len(),
            concurrent_limit
        );

        let results: Vec<_> = stream::iter(files)
            .map(|file| {
                let pb = pb.clone();
                async move {
                    let name = file.name.clone();
                    let result = task::spawn_blocking(move || {
                        parse_event_file(&file.name, &file.content, source)
                    })
                    .await;
                    pb.inc(1);
                    (name, result)
                }
            })
            .buffered(concurrent_limit)
            .collect()
            .await;

        pb.finish_with_message("Event files parsed");

        let mut parsed = Vec::with_capacity(results.len());
        let mut failed = 0usize;
        for (name, result) in results {
            match result {
                Ok(file) => parsed.push(file),
                Err(e) => {
                    error!("Failed to parse {}: {}", name, e);
                    failed += 1;
                }
            }
        }
        (parsed, failed)
    }
}

fn print_summary(stats: &ProcessingStats) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files processed:".bright_cyan(),
        stats.files_processed.to_string().bright_white()
    );
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            stats.files_failed.to_string().bright_red().bold()
        );
    }
    if stats.archives_unavailable > 0 {
        println!(
            "  {} {}",
            "Archives unavailable:".bright_red(),
            stats.archives_unavailable.to_string().bright_red().bold()
        );
    }
    if stats.archives_empty > 0 {
        println!(
            "  {} {}",
            "Archives empty:".bright_yellow(),
            stats.archives_empty.to_string().bright_yellow()
        );
    }
    println!(
        "  {} {}",
        "Games:".bright_cyan(),
        stats.games.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Plays:".bright_cyan(),
        stats.plays.to_string().bright_white().bold()
    );
    if stats.decode_errors > 0 {
        println!(
            "  {} {}",
            "Decode errors:".bright_yellow(),
            stats.decode_errors.to_string().bright_yellow()
        );
    }
    if stats.orphan_records > 0 {
        println!(
            "  {} {}",
            "Records before first game:".bright_yellow(),
            stats.orphan_records.to_string().bright_yellow()
        );
    }
}
