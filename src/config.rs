//! Configuration management and validation.
//!
//! Provides the processing configuration: concurrency, Parquet compression,
//! which tables to write and how strictly decode errors are treated.

use crate::constants::tables;
use crate::error::{Result, RetroError};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = RetroError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "snappy" => Ok(CompressionAlgorithm::Snappy),
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            "lz4" => Ok(CompressionAlgorithm::Lz4),
            "none" | "uncompressed" => Ok(CompressionAlgorithm::Uncompressed),
            other => Err(RetroError::configuration(format!(
                "Unknown compression algorithm '{}'. Valid options: snappy, zstd, lz4, none",
                other
            ))),
        }
    }
}

/// Projected tables to write for each archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSelection {
    pub metadata: bool,
    pub plays: bool,
    pub lineups: bool,
    pub data: bool,
}

impl Default for TableSelection {
    fn default() -> Self {
        Self {
            metadata: true,
            plays: true,
            lineups: true,
            data: true,
        }
    }
}

impl TableSelection {
    pub fn none() -> Self {
        Self {
            metadata: false,
            plays: false,
            lineups: false,
            data: false,
        }
    }

    /// Parse a comma-separated list such as `metadata,plays`
    pub fn parse_list(list: &str) -> Result<Self> {
        let mut selection = Self::none();
        for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            match name {
                tables::METADATA => selection.metadata = true,
                tables::PLAYS => selection.plays = true,
                tables::LINEUPS => selection.lineups = true,
                tables::DATA => selection.data = true,
                other => {
                    return Err(RetroError::configuration(format!(
                        "Unknown table '{}'. Valid options: metadata, plays, lineups, data",
                        other
                    )));
                }
            }
        }
        Ok(selection)
    }

    pub fn is_empty(&self) -> bool {
        !(self.metadata || self.plays || self.lineups || self.data)
    }
}

/// Global configuration for Retrosheet processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Maximum event files parsed concurrently
    pub max_concurrent_files: usize,

    /// Parquet compression for written tables
    pub compression: CompressionAlgorithm,

    /// Tables to write
    pub tables: TableSelection,

    /// Count files with decode errors as failed and leave them out of output
    pub fail_on_decode_errors: bool,

    /// Parse and report without writing any Parquet files
    pub dry_run: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_files: num_cpus::get().max(1),
            compression: CompressionAlgorithm::Snappy,
            tables: TableSelection::default(),
            fail_on_decode_errors: false,
            dry_run: false,
        }
    }
}

impl ProcessorConfig {
    /// Set maximum concurrent files
    pub fn with_max_concurrent_files(mut self, max_files: usize) -> Self {
        self.max_concurrent_files = max_files;
        self
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_tables(mut self, tables: TableSelection) -> Self {
        self.tables = tables;
        self
    }

    /// Treat any decode error as a file failure
    pub fn with_strict_decoding(mut self) -> Self {
        self.fail_on_decode_errors = true;
        self
    }

    pub fn with_dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_files == 0 {
            return Err(RetroError::configuration(
                "max_concurrent_files must be at least 1",
            ));
        }
        if self.tables.is_empty() {
            return Err(RetroError::configuration("no output tables selected"));
        }
        debug!("Configuration validated: {:?}", self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ProcessorConfig::default();
        assert!(config.max_concurrent_files >= 1);
        assert!(config.validate().is_ok());
        assert!(!config.fail_on_decode_errors);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = ProcessorConfig::default().with_max_concurrent_files(0);
        assert!(matches!(
            config.validate(),
            Err(RetroError::Configuration { .. })
        ));
    }

    #[test]
    fn test_empty_table_selection_rejected() {
        let config = ProcessorConfig::default().with_tables(TableSelection::none());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_table_list_parsing() {
        let selection = TableSelection::parse_list("plays, metadata").unwrap();
        assert!(selection.plays && selection.metadata);
        assert!(!selection.lineups && !selection.data);
        assert!(TableSelection::parse_list("boxscore").is_err());
        assert!(TableSelection::parse_list("").unwrap().is_empty());
    }

    #[test]
    fn test_compression_parsing() {
        assert_eq!(
            "ZSTD".parse::<CompressionAlgorithm>().unwrap(),
            CompressionAlgorithm::Zstd
        );
        assert_eq!(
            "none".parse::<CompressionAlgorithm>().unwrap(),
            CompressionAlgorithm::Uncompressed
        );
        assert!("brotli".parse::<CompressionAlgorithm>().is_err());
    }
}
