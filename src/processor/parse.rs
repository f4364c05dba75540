//! Single-file parse: tokenize, stamp game ids, decode.
//!
//! Pure computation over already-read text. No I/O and no shared state, so
//! any number of files can be parsed in parallel.

use crate::boundary::{assign_game_ids, orphan_ranges};
use crate::constants::record_types;
use crate::decoders::{DecodedBatch, decode_all};
use crate::error::{DecodeError, OrphanRange};
use crate::models::EventSource;
use crate::tokenizer::tokenize_file;
use tracing::{debug, warn};

/// Everything one event file produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    pub name: String,
    pub source: EventSource,
    pub batch: DecodedBatch,
    pub orphans: Vec<OrphanRange>,
}

impl ParsedFile {
    pub fn record_count(&self) -> usize {
        self.batch.records.len()
    }

    pub fn game_count(&self) -> usize {
        self.count_type(record_types::ID)
    }

    pub fn play_count(&self) -> usize {
        self.count_type(record_types::PLAY)
    }

    pub fn errors(&self) -> &[DecodeError] {
        &self.batch.errors
    }

    pub fn orphan_count(&self) -> usize {
        self.orphans.iter().map(|range| range.count).sum()
    }

    fn count_type(&self, record_type: &str) -> usize {
        self.batch
            .records
            .iter()
            .filter(|keyed| keyed.record.record_type() == Some(record_type))
            .count()
    }
}

/// Parse one event file's text.
///
/// Never fails: bad records are reported in `batch.errors`, records before
/// the first game in `orphans`.
pub fn parse_event_file(name: &str, content: &str, source: EventSource) -> ParsedFile {
    let records = assign_game_ids(tokenize_file(content, source));
    let orphans = orphan_ranges(&records);
    for range in &orphans {
        warn!(
            "{}: {} records on lines {}-{} precede any game id",
            name, range.count, range.first_line, range.last_line
        );
    }

    let batch = decode_all(&records);
    for error in &batch.errors {
        debug!("{}: {}", name, error);
    }
    if !batch.errors.is_empty() {
        warn!("{}: {} decode errors", name, batch.errors.len());
    }

    ParsedFile {
        name: name.to_string(),
        source,
        batch,
        orphans,
    }
}
