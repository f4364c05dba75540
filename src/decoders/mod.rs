//! Record-type decoders.
//!
//! Each known record type maps a raw field list to a typed record. Lookup
//! is by exact tag through [`DECODERS`]; any other tag decodes to
//! [`StructuredRecord::Opaque`] holding the fields rejoined with commas, so
//! new record types in future files never break a parse.
//!
//! Decoding is tolerant of short field lists (missing fields are `None`) but
//! not of corrupt numbers: those become `None` *and* a [`DecodeError`].

pub mod fields;
pub mod identity;
pub mod info;
pub mod lineup;
pub mod play;

pub use identity::{GameId, GameIdError, GameIdentityRecord, VersionRecord};
pub use info::{CommentRecord, DataRecord, InfoRecord};
pub use lineup::LineupRecord;
pub use play::PlayRecord;

use self::fields::{FieldIssue, FieldReader};
use crate::constants::record_types;
use crate::error::DecodeError;
use crate::models::{EventSource, RawRecord};
use serde::Serialize;

/// A decoded record, one variant per known record type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StructuredRecord {
    GameIdentity(GameIdentityRecord),
    Version(VersionRecord),
    Info(InfoRecord),
    Start(LineupRecord),
    Play(PlayRecord),
    Sub(LineupRecord),
    Comment(CommentRecord),
    Data(DataRecord),
    /// Unknown record type: raw fields joined with commas
    Opaque(String),
}

impl StructuredRecord {
    /// Tag of the decoder that produced this record; `None` for opaque records
    pub fn record_type(&self) -> Option<&'static str> {
        use StructuredRecord::*;
        match self {
            GameIdentity(_) => Some(record_types::ID),
            Version(_) => Some(record_types::VERSION),
            Info(_) => Some(record_types::INFO),
            Start(_) => Some(record_types::START),
            Play(_) => Some(record_types::PLAY),
            Sub(_) => Some(record_types::SUB),
            Comment(_) => Some(record_types::COMMENT),
            Data(_) => Some(record_types::DATA),
            Opaque(_) => None,
        }
    }
}

pub type DecodeFn = fn(&mut FieldReader<'_>) -> StructuredRecord;

/// Known record-type tags and their decoders
pub const DECODERS: [(&str, DecodeFn); 8] = [
    (record_types::ID, decode_id),
    (record_types::VERSION, decode_version),
    (record_types::INFO, decode_info),
    (record_types::START, decode_start),
    (record_types::PLAY, decode_play),
    (record_types::SUB, decode_sub),
    (record_types::COMMENT, decode_comment),
    (record_types::DATA, decode_data),
];

fn decode_id(reader: &mut FieldReader<'_>) -> StructuredRecord {
    StructuredRecord::GameIdentity(identity::read_game_identity(reader))
}

fn decode_version(reader: &mut FieldReader<'_>) -> StructuredRecord {
    StructuredRecord::Version(identity::read_version(reader))
}

fn decode_info(reader: &mut FieldReader<'_>) -> StructuredRecord {
    StructuredRecord::Info(info::read_info(reader))
}

fn decode_start(reader: &mut FieldReader<'_>) -> StructuredRecord {
    StructuredRecord::Start(lineup::read_lineup(reader))
}

fn decode_play(reader: &mut FieldReader<'_>) -> StructuredRecord {
    StructuredRecord::Play(play::read_play(reader))
}

fn decode_sub(reader: &mut FieldReader<'_>) -> StructuredRecord {
    StructuredRecord::Sub(lineup::read_lineup(reader))
}

fn decode_comment(reader: &mut FieldReader<'_>) -> StructuredRecord {
    StructuredRecord::Comment(info::read_comment(reader))
}

fn decode_data(reader: &mut FieldReader<'_>) -> StructuredRecord {
    StructuredRecord::Data(info::read_data(reader))
}

fn lookup(record_type: &str) -> Option<DecodeFn> {
    DECODERS
        .iter()
        .find(|(tag, _)| *tag == record_type)
        .map(|(_, decoder)| *decoder)
}

/// True for the closed set of record types with a dedicated decoder
pub fn is_known_record_type(record_type: &str) -> bool {
    lookup(record_type).is_some()
}

/// Result of decoding one record's fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub record: StructuredRecord,
    pub issues: Vec<FieldIssue>,
}

/// Decode one record by its type tag.
pub fn decode(record_type: &str, fields: &[String]) -> Decoded {
    match lookup(record_type) {
        Some(decoder) => {
            let mut reader = FieldReader::new(fields);
            let record = decoder(&mut reader);
            Decoded {
                record,
                issues: reader.into_issues(),
            }
        }
        None => Decoded {
            record: StructuredRecord::Opaque(fields.join(",")),
            issues: Vec::new(),
        },
    }
}

/// A decoded value with the position and game it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keyed<T> {
    pub line_number: usize,
    pub game_id: Option<String>,
    pub source: EventSource,
    pub record: T,
}

impl<T> Keyed<T> {
    fn rekey<U>(&self, record: U) -> Keyed<U> {
        Keyed {
            line_number: self.line_number,
            game_id: self.game_id.clone(),
            source: self.source,
            record,
        }
    }
}

/// All records of one parse, decoded, in line order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedBatch {
    pub records: Vec<Keyed<StructuredRecord>>,
    pub errors: Vec<DecodeError>,
}

/// Decode every record; per-record failures are collected, never fatal.
pub fn decode_all(records: &[RawRecord]) -> DecodedBatch {
    let mut batch = DecodedBatch {
        records: Vec::with_capacity(records.len()),
        errors: Vec::new(),
    };

    for raw in records {
        let Decoded { record, issues } = decode(&raw.record_type, &raw.fields);
        batch
            .errors
            .extend(issues.into_iter().map(|issue| DecodeError {
                line_number: raw.line_number,
                record_type: raw.record_type.clone(),
                field: issue.field,
                value: issue.value,
                reason: issue.reason,
            }));
        batch.records.push(Keyed {
            line_number: raw.line_number,
            game_id: raw.game_id.clone(),
            source: raw.source,
            record,
        });
    }

    batch
}

impl DecodedBatch {
    pub fn game_identities(&self) -> Vec<Keyed<GameIdentityRecord>> {
        self.select(|record| match record {
            StructuredRecord::GameIdentity(id) => Some(id.clone()),
            _ => None,
        })
    }

    pub fn info_records(&self) -> Vec<Keyed<InfoRecord>> {
        self.select(|record| match record {
            StructuredRecord::Info(info) => Some(info.clone()),
            _ => None,
        })
    }

    pub fn play_records(&self) -> Vec<Keyed<PlayRecord>> {
        self.select(|record| match record {
            StructuredRecord::Play(play) => Some(play.clone()),
            _ => None,
        })
    }

    /// Starts and subs in line order; the flag is true for substitutions
    pub fn lineup_records(&self) -> Vec<Keyed<(LineupRecord, bool)>> {
        self.select(|record| match record {
            StructuredRecord::Start(lineup) => Some((lineup.clone(), false)),
            StructuredRecord::Sub(lineup) => Some((lineup.clone(), true)),
            _ => None,
        })
    }

    pub fn data_records(&self) -> Vec<Keyed<DataRecord>> {
        self.select(|record| match record {
            StructuredRecord::Data(data) => Some(data.clone()),
            _ => None,
        })
    }

    fn select<T>(&self, pick: impl Fn(&StructuredRecord) -> Option<T>) -> Vec<Keyed<T>> {
        self.records
            .iter()
            .filter_map(|keyed| pick(&keyed.record).map(|record| keyed.rekey(record)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::assign_game_ids;
    use crate::models::{SourceType, TeamSide};
    use crate::tokenizer::tokenize_file;

    fn owned(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_dispatch_play() {
        let decoded = decode("play", &owned(&["1", "0", "jeted001", "32", "BCFBX", "S7"]));
        assert!(decoded.issues.is_empty());
        match decoded.record {
            StructuredRecord::Play(play) => {
                assert_eq!(play.inning, Some(1));
                assert_eq!(play.team_side, Some(TeamSide::Visiting));
                assert_eq!(play.event.as_deref(), Some("S7"));
            }
            other => panic!("expected play, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_is_opaque() {
        let decoded = decode("foo", &owned(&["a", "b"]));
        assert_eq!(decoded.record, StructuredRecord::Opaque("a,b".to_string()));
        assert!(decoded.issues.is_empty());
    }

    #[test]
    fn test_dispatch_is_exact_match() {
        assert!(is_known_record_type("sub"));
        assert!(!is_known_record_type("SUB"));
        assert!(!is_known_record_type("badj"));
        assert!(matches!(
            decode("Play", &owned(&["1"])).record,
            StructuredRecord::Opaque(_)
        ));
    }

    #[test]
    fn test_start_and_sub_share_layout() {
        let fields = owned(&["jeted001"]);
        let start = decode("start", &fields).record;
        let sub = decode("sub", &fields).record;
        match (start, sub) {
            (StructuredRecord::Start(a), StructuredRecord::Sub(b)) => assert_eq!(a, b),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_decode_all_reports_errors_by_line() {
        let source = EventSource::new(2023, SourceType::Season);
        let raw = assign_game_ids(tokenize_file(
            "id,NYA202304070\nstart,a,\"A\",x,1,6\nplay,1,0,a,00,,NP\ndata,er,a,q",
            source,
        ));
        let batch = decode_all(&raw);

        assert_eq!(batch.records.len(), 4);
        let lines: Vec<usize> = batch.errors.iter().map(|e| e.line_number).collect();
        assert_eq!(lines, vec![2, 4]);
        assert_eq!(batch.errors[0].field, "team_side");
        assert_eq!(batch.errors[1].record_type, "data");

        // Records with errors are still present, with the bad field nulled.
        assert_eq!(batch.lineup_records()[0].record.0.team_side, None);
        assert_eq!(batch.data_records()[0].record.numeric_value, None);
    }

    #[test]
    fn test_selectors_keep_game_and_line() {
        let source = EventSource::new(2023, SourceType::PostSeason);
        let raw = assign_game_ids(tokenize_file(
            "id,NYA202310010\ninfo,visteam,BOS\nplay,1,0,a,00,,NP\nsub,b,\"B\",0,1,11",
            source,
        ));
        let batch = decode_all(&raw);

        let plays = batch.play_records();
        assert_eq!(plays.len(), 1);
        assert_eq!(plays[0].line_number, 3);
        assert_eq!(plays[0].game_id.as_deref(), Some("NYA202310010"));
        assert_eq!(plays[0].source, source);

        let lineups = batch.lineup_records();
        assert!(lineups[0].record.1);
        assert_eq!(batch.info_records().len(), 1);
        assert_eq!(batch.game_identities().len(), 1);
    }
}
