//! Parquet writing for projected tables.
//!
//! Each archive produces up to four tables, written as
//! `{archive stem}_{table}.parquet` into the output directory.

use crate::config::CompressionAlgorithm;
use crate::error::{Result, RetroError};

use polars::prelude::{DataFrame, ParquetWriter as PolarsParquetWriter, StatisticsOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes DataFrames to Parquet files in one directory
#[derive(Debug, Clone)]
pub struct TableWriter {
    output_dir: PathBuf,
    compression: CompressionAlgorithm,
}

impl TableWriter {
    pub fn new(output_dir: PathBuf, compression: CompressionAlgorithm) -> Self {
        Self {
            output_dir,
            compression,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path a table for an archive will be written to
    pub fn table_path(&self, archive_stem: &str, table: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.parquet", archive_stem, table))
    }

    /// Write one table, returning its path
    pub fn write_table(
        &self,
        mut df: DataFrame,
        archive_stem: &str,
        table: &str,
    ) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.table_path(archive_stem, table);

        let file = std::fs::File::create(&path)?;
        PolarsParquetWriter::new(file)
            .with_compression(self.compression.to_polars_compression())
            .with_statistics(StatisticsOptions::full())
            .finish(&mut df)
            .map_err(|e| RetroError::ProcessingFailed {
                path: path.clone(),
                reason: format!("Failed to write parquet: {}", e),
            })?;

        debug!("Wrote {} rows to {}", df.height(), path.display());
        Ok(path)
    }
}
