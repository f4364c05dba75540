//! Lineup records: `start` (starting lineup) and `sub` (substitution).
//!
//! Both share one layout:
//! `player_id, "player name", team side, batting order, field position`.

use super::fields::FieldReader;
use crate::constants::BATTING_ORDER_RANGE;
use crate::models::{FieldPosition, TeamSide};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineupRecord {
    pub player_id: Option<String>,
    pub player_name: Option<String>,
    pub team_side: Option<TeamSide>,
    /// 1-9; `None` for pitchers outside the batting order under DH rules
    pub batting_order: Option<u8>,
    pub field_position: Option<FieldPosition>,
}

pub(super) fn read_lineup(reader: &mut FieldReader<'_>) -> LineupRecord {
    let player_id = reader.text(0);
    let player_name = reader.text(1);
    let team_side = reader.coded(2, "team_side", TeamSide::from_code);
    // Slot 0 is the DH-rule pitcher; numeric but out of range is not an error.
    let batting_order = reader
        .integer(3, "batting_order")
        .filter(|order| BATTING_ORDER_RANGE.contains(order))
        .map(|order| order as u8);
    let field_position = reader.coded(4, "field_position", FieldPosition::from_code);

    LineupRecord {
        player_id,
        player_name,
        team_side,
        batting_order,
        field_position,
    }
}
