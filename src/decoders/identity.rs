//! Game identity (`id`) and format version (`version`) records.

use super::fields::FieldReader;
use crate::constants::GAME_ID_LEN;
use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

static GAME_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z0-9]{3})(\d{4})(\d{2})(\d{2})(\d)$").expect("valid game id regex")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameIdError {
    #[error("expected 12 characters, found {0}")]
    WrongLength(usize),

    #[error("expected team code, yyyymmdd date and game number")]
    BadLayout,

    #[error("{year:04}-{month:02}-{day:02} is not a calendar date")]
    InvalidDate { year: i32, month: u32, day: u32 },
}

/// Parsed game identifier, e.g. `NYA202304070`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GameId {
    pub home_team: String,
    pub date: NaiveDate,
    /// 0 for a single game, 1 or 2 for doubleheader games
    pub game_number: u8,
}

impl FromStr for GameId {
    type Err = GameIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let length = s.chars().count();
        if length != GAME_ID_LEN {
            return Err(GameIdError::WrongLength(length));
        }
        let caps = GAME_ID_RE.captures(s).ok_or(GameIdError::BadLayout)?;

        // The regex guarantees these are ASCII digits.
        let number = |i: usize| caps[i].parse::<u32>().map_err(|_| GameIdError::BadLayout);
        let year = number(2)? as i32;
        let month = number(3)?;
        let day = number(4)?;
        let game_number = number(5)? as u8;

        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(GameIdError::InvalidDate { year, month, day })?;

        Ok(GameId {
            home_team: caps[1].to_string(),
            date,
            game_number,
        })
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.home_team,
            self.date.format("%Y%m%d"),
            self.game_number
        )
    }
}

/// Decoded `id` record.
///
/// `game_id` keeps the raw identifier even when it fails validation, so that
/// boundary tracking still separates games; `parsed` is only set when valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameIdentityRecord {
    pub game_id: Option<String>,
    pub parsed: Option<GameId>,
}

/// Decoded `version` record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionRecord {
    pub version: Option<String>,
}

pub(super) fn read_game_identity(reader: &mut FieldReader<'_>) -> GameIdentityRecord {
    let game_id = reader.text(0);
    let parsed = match game_id.as_deref() {
        Some(raw) => match raw.parse::<GameId>() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                reader.issue("game_id", raw, e.to_string());
                None
            }
        },
        None => None,
    };
    GameIdentityRecord { game_id, parsed }
}

pub(super) fn read_version(reader: &mut FieldReader<'_>) -> VersionRecord {
    VersionRecord {
        version: reader.text(0),
    }
}

/// Decode an `id` record's fields without collecting issues
pub fn decode_game_identity(fields: &[String]) -> GameIdentityRecord {
    read_game_identity(&mut FieldReader::new(fields))
}
