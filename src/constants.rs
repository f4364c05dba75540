//! Application constants for the Retrosheet processor
//!
//! Record-type tags, file layout conventions and table names used
//! throughout the processor.

// =============================================================================
// Record Layout
// =============================================================================

/// Field delimiter within an event-file line
pub const FIELD_DELIMITER: char = ',';

/// Quote character; quoted segments may contain literal delimiters
pub const QUOTE_CHAR: char = '"';

/// Record-type tags with a dedicated decoder
pub mod record_types {
    pub const ID: &str = "id";
    pub const VERSION: &str = "version";
    pub const INFO: &str = "info";
    pub const START: &str = "start";
    pub const PLAY: &str = "play";
    pub const SUB: &str = "sub";
    pub const COMMENT: &str = "com";
    pub const DATA: &str = "data";
}

/// Length of a game identifier: team(3) + yyyymmdd(8) + game number(1)
pub const GAME_ID_LEN: usize = 12;

/// Batting order slots; anything outside (e.g. 0 for a DH-rule pitcher) is null
pub const BATTING_ORDER_RANGE: std::ops::RangeInclusive<i64> = 1..=9;

// =============================================================================
// Cache Layout
// =============================================================================

/// Application directory under the user data directory
pub const CACHE_APP_DIR: &str = "retrosheet";

/// Cache directory under the application directory
pub const CACHE_SUBDIR: &str = "cache";

/// Event file extensions (team season files are .EVA/.EVN, others .EVE)
pub const EVENT_FILE_EXTENSIONS: &[&str] = &["eva", "evn", "eve"];

// =============================================================================
// Output Tables
// =============================================================================

pub mod tables {
    pub const METADATA: &str = "metadata";
    pub const PLAYS: &str = "plays";
    pub const LINEUPS: &str = "lineups";
    pub const DATA: &str = "data";
}

/// Leading join-key column of every projected table
pub const GAME_ID_COLUMN: &str = "game_id";
