//! Retrosheet Processor Library
//!
//! Parses Retrosheet play-by-play event files into analysis-ready tables.
//!
//! The pipeline for one file is pure and single-pass:
//! - [`tokenize`] splits each line into a record type and raw fields
//! - [`assign_game_ids`] stamps every record with the game it belongs to
//! - [`decode`] turns raw fields into typed records, tolerant of short lines
//! - [`project_metadata`] and [`project_plays`] reshape decoded records into
//!   Polars DataFrames
//!
//! [`processor::ArchiveProcessor`] runs that pipeline over cached archives,
//! many files at once, and writes Parquet output.

pub mod boundary;
pub mod cli;
pub mod config;
pub mod constants;
pub mod decoders;
pub mod error;
pub mod models;
pub mod processor;
pub mod projection;
pub mod source;
pub mod tokenizer;

pub use boundary::assign_game_ids;
pub use config::ProcessorConfig;
pub use decoders::{StructuredRecord, decode, decode_all};
pub use error::{DecodeError, OrphanRange, Result, RetroError};
pub use models::{EventSource, RawRecord, SourceType};
pub use processor::{ParsedFile, parse_event_file};
pub use projection::{project_metadata, project_plays};
pub use tokenizer::tokenize;
