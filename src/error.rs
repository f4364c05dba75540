//! Error handling for Retrosheet processing operations.
//!
//! File- and batch-level failures are `RetroError`. Problems confined to a
//! single record are not errors of the parse: they are collected as
//! [`DecodeError`] values (bad numeric fields) or [`OrphanRange`] warnings
//! (records with no preceding game-identity record) next to the parsed output.

use crate::models::SourceType;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RetroError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Archive {year} {source_type} could not be retrieved: {reason}")]
    Retrieval {
        year: i32,
        source_type: SourceType,
        reason: String,
    },

    #[error("Cache directory not found at path: {path}")]
    CacheNotFound { path: PathBuf },

    #[error("Processing failed for file: {path} - {reason}")]
    ProcessingFailed { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },
}

impl RetroError {
    pub fn retrieval(year: i32, source_type: SourceType, reason: impl Into<String>) -> Self {
        Self::Retrieval {
            year,
            source_type,
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// True when the failure happened before any content was read.
    pub fn is_retrieval(&self) -> bool {
        matches!(self, Self::Retrieval { .. } | Self::CacheNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, RetroError>;

/// A record-scoped decode failure: a field was present but could not be
/// coerced to its expected type. The decoded record carries `None` in its place.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("line {line_number}: {record_type} field '{field}' = {value:?}: {reason}")]
pub struct DecodeError {
    pub line_number: usize,
    pub record_type: String,
    pub field: &'static str,
    pub value: String,
    pub reason: String,
}

/// A contiguous run of records that appeared before any `id` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrphanRange {
    pub first_line: usize,
    pub last_line: usize,
    pub count: usize,
}
