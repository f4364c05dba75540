//! Core data structures and types for Retrosheet processing.
//!
//! Defines archive categories, the raw tokenized record, shared field
//! vocabularies and processing statistics used throughout the library.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Archive categories published by the data provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SourceType {
    Season,
    AllStar,
    PostSeason,
}

impl SourceType {
    pub const ALL: [SourceType; 3] = [
        SourceType::Season,
        SourceType::AllStar,
        SourceType::PostSeason,
    ];

    /// Suffix used in archive names: `eve`, `as` or `post`
    pub fn archive_suffix(&self) -> &'static str {
        match self {
            SourceType::Season => "eve",
            SourceType::AllStar => "as",
            SourceType::PostSeason => "post",
        }
    }

    /// Archive stem for a year, e.g. `2023eve`
    pub fn archive_stem(&self, year: i32) -> String {
        format!("{}{}", year, self.archive_suffix())
    }

    /// Archive file name for a year, e.g. `2023eve.zip`
    pub fn archive_name(&self, year: i32) -> String {
        format!("{}.zip", self.archive_stem(year))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Season => "season",
            SourceType::AllStar => "all-star",
            SourceType::PostSeason => "post-season",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "season" | "regular" | "eve" => Ok(SourceType::Season),
            "all-star" | "allstar" | "as" => Ok(SourceType::AllStar),
            "post-season" | "postseason" | "post" => Ok(SourceType::PostSeason),
            other => Err(format!("unknown archive category: {}", other)),
        }
    }
}

/// Where a record came from: the year and category of its archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventSource {
    pub year: i32,
    pub source_type: SourceType,
}

impl EventSource {
    pub fn new(year: i32, source_type: SourceType) -> Self {
        Self { year, source_type }
    }
}

/// One non-empty input line after tokenization.
///
/// `game_id` is `None` until the boundary tracker stamps it, and stays `None`
/// for records that precede the first `id` record of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawRecord {
    pub line_number: usize,
    pub record_type: String,
    pub fields: Vec<String>,
    pub game_id: Option<String>,
    pub source: EventSource,
}

impl RawRecord {
    pub fn new(
        line_number: usize,
        record_type: impl Into<String>,
        fields: Vec<String>,
        source: EventSource,
    ) -> Self {
        Self {
            line_number,
            record_type: record_type.into(),
            fields,
            game_id: None,
            source,
        }
    }
}

/// Batting side of a team in a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSide {
    Visiting = 0,
    Home = 1,
}

impl TeamSide {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(TeamSide::Visiting),
            1 => Some(TeamSide::Home),
            _ => None,
        }
    }

    pub fn code(&self) -> u32 {
        *self as u32
    }
}

/// Fixed defensive/substitution position vocabulary (1-12)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldPosition {
    Pitcher = 1,
    Catcher = 2,
    FirstBase = 3,
    SecondBase = 4,
    ThirdBase = 5,
    Shortstop = 6,
    LeftField = 7,
    CenterField = 8,
    RightField = 9,
    DesignatedHitter = 10,
    PinchHitter = 11,
    PinchRunner = 12,
}

impl FieldPosition {
    pub fn from_code(code: i64) -> Option<Self> {
        use FieldPosition::*;
        let position = match code {
            1 => Pitcher,
            2 => Catcher,
            3 => FirstBase,
            4 => SecondBase,
            5 => ThirdBase,
            6 => Shortstop,
            7 => LeftField,
            8 => CenterField,
            9 => RightField,
            10 => DesignatedHitter,
            11 => PinchHitter,
            12 => PinchRunner,
            _ => return None,
        };
        Some(position)
    }

    pub fn code(&self) -> u32 {
        *self as u32
    }

    pub fn abbreviation(&self) -> &'static str {
        use FieldPosition::*;
        match self {
            Pitcher => "P",
            Catcher => "C",
            FirstBase => "1B",
            SecondBase => "2B",
            ThirdBase => "3B",
            Shortstop => "SS",
            LeftField => "LF",
            CenterField => "CF",
            RightField => "RF",
            DesignatedHitter => "DH",
            PinchHitter => "PH",
            PinchRunner => "PR",
        }
    }
}

/// One event file's name and full text, as supplied by a collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFile {
    pub name: String,
    pub content: String,
}

impl EventFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Processing statistics
#[derive(Debug, Default, Clone, Serialize)]
pub struct ProcessingStats {
    pub archives_requested: usize,
    pub archives_unavailable: usize,
    pub archives_empty: usize,
    pub files_processed: usize,
    pub files_failed: usize,
    pub games: usize,
    pub plays: usize,
    pub decode_errors: usize,
    pub orphan_records: usize,
    pub output_paths: Vec<PathBuf>,
    pub processing_time_ms: u128,
}

impl ProcessingStats {
    /// Fold another archive's stats into this one
    pub fn merge(&mut self, other: ProcessingStats) {
        self.archives_requested += other.archives_requested;
        self.archives_unavailable += other.archives_unavailable;
        self.archives_empty += other.archives_empty;
        self.files_processed += other.files_processed;
        self.files_failed += other.files_failed;
        self.games += other.games;
        self.plays += other.plays;
        self.decode_errors += other.decode_errors;
        self.orphan_records += other.orphan_records;
        self.output_paths.extend(other.output_paths);
    }
}
