//! Play records:
//! `inning, team side, batter id, count, pitch sequence, event`.
//!
//! The event string is kept exactly as written; its notation is for
//! downstream consumers to interpret.

use super::fields::FieldReader;
use crate::models::TeamSide;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayRecord {
    pub inning: Option<u32>,
    pub team_side: Option<TeamSide>,
    pub player_id: Option<String>,
    pub count: Option<String>,
    pub pitch_sequence: Option<String>,
    pub event: Option<String>,
}

impl PlayRecord {
    /// Balls in the count, when the count is known
    pub fn balls(&self) -> Option<u32> {
        self.count_digit(0)
    }

    /// Strikes in the count, when the count is known
    pub fn strikes(&self) -> Option<u32> {
        self.count_digit(1)
    }

    // "??" marks an unknown count
    fn count_digit(&self, position: usize) -> Option<u32> {
        self.count
            .as_deref()
            .filter(|count| count.len() == 2)
            .and_then(|count| count.chars().nth(position))
            .and_then(|c| c.to_digit(10))
    }
}

pub(super) fn read_play(reader: &mut FieldReader<'_>) -> PlayRecord {
    let inning = match reader.integer(0, "inning") {
        Some(inning) if inning >= 1 => match u32::try_from(inning) {
            Ok(inning) => Some(inning),
            Err(_) => {
                reader.issue("inning", &inning.to_string(), "inning out of range");
                None
            }
        },
        Some(inning) => {
            reader.issue("inning", &inning.to_string(), "inning must be positive");
            None
        }
        None => None,
    };

    PlayRecord {
        inning,
        team_side: reader.coded(1, "team_side", TeamSide::from_code),
        player_id: reader.text(2),
        count: reader.text(3),
        pitch_sequence: reader.text(4),
        event: reader.text(5),
    }
}
