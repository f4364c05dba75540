//! Table projections over decoded records.
//!
//! Reshapes keyed records into Polars DataFrames with `game_id` as the
//! leading join key:
//! - metadata: one row per game, one column per distinct `info_type`
//! - plays: one row per `play` record
//! - lineups: one row per `start`/`sub` record
//! - data: one row per `data` record
//!
//! Row-level projections never drop or merge input rows. Rows are grouped by
//! game in first-seen order and kept in line order within each game.

use crate::constants::GAME_ID_COLUMN;
use crate::decoders::{DataRecord, InfoRecord, Keyed, LineupRecord, PlayRecord};
use crate::error::Result;
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Pivot `info` records into one row per game.
///
/// Columns are `game_id` followed by every `info_type` seen anywhere in the
/// input, in first-seen order. Games without a given type get a null cell.
/// When a game repeats an `info_type`, the first occurrence wins.
pub fn project_metadata(records: &[Keyed<InfoRecord>]) -> Result<DataFrame> {
    let mut games: Vec<Option<String>> = Vec::new();
    let mut game_index: HashMap<Option<String>, usize> = HashMap::new();
    let mut column_names: Vec<String> = Vec::new();
    let mut column_index: HashMap<String, usize> = HashMap::new();
    // cells[column][game]; `filled` tracks first occurrence even for null values
    let mut cells: Vec<Vec<Option<String>>> = Vec::new();
    let mut filled: Vec<Vec<bool>> = Vec::new();
    let mut skipped = 0usize;

    for keyed in records {
        let game = *game_index.entry(keyed.game_id.clone()).or_insert_with(|| {
            games.push(keyed.game_id.clone());
            for column in cells.iter_mut() {
                column.push(None);
            }
            for column in filled.iter_mut() {
                column.push(false);
            }
            games.len() - 1
        });

        let Some(info_type) = keyed.record.info_type.as_deref() else {
            skipped += 1;
            continue;
        };
        let name = metadata_column_name(info_type);
        let column = *column_index.entry(name.clone()).or_insert_with(|| {
            column_names.push(name);
            cells.push(vec![None; games.len()]);
            filled.push(vec![false; games.len()]);
            column_names.len() - 1
        });

        if !filled[column][game] {
            filled[column][game] = true;
            cells[column][game] = keyed.record.info_value.clone();
        }
    }

    if skipped > 0 {
        debug!("Skipped {} info records without an info type", skipped);
    }

    let mut columns: Vec<Column> = Vec::with_capacity(column_names.len() + 1);
    columns.push(Series::new(GAME_ID_COLUMN.into(), games).into());
    for (name, values) in column_names.into_iter().zip(cells) {
        columns.push(Series::new(name.into(), values).into());
    }

    Ok(DataFrame::new(columns)?)
}

const RENAMED_PREFIX: &str = "info_";

// An info type can't shadow the join key. `game_id` and anything already
// carrying the prefix get one more prefix, so distinct types stay distinct.
fn metadata_column_name(info_type: &str) -> String {
    if info_type == GAME_ID_COLUMN || info_type.starts_with(RENAMED_PREFIX) {
        format!("{}{}", RENAMED_PREFIX, info_type)
    } else {
        info_type.to_string()
    }
}

/// Flatten `play` records into one row each.
pub fn project_plays(records: &[Keyed<PlayRecord>]) -> Result<DataFrame> {
    let rows = ordered_by_game(records);

    let columns: Vec<Column> = vec![
        game_id_column(&rows),
        line_number_column(&rows),
        Series::new(
            "inning".into(),
            rows.iter().map(|r| r.record.inning).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "team_side".into(),
            rows.iter()
                .map(|r| r.record.team_side.map(|side| side.code()))
                .collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "player_id".into(),
            rows.iter()
                .map(|r| r.record.player_id.clone())
                .collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "count".into(),
            rows.iter().map(|r| r.record.count.clone()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "pitch_sequence".into(),
            rows.iter()
                .map(|r| r.record.pitch_sequence.clone())
                .collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "event".into(),
            rows.iter().map(|r| r.record.event.clone()).collect::<Vec<_>>(),
        )
        .into(),
        source_year_column(&rows),
        source_type_column(&rows),
    ];

    Ok(DataFrame::new(columns)?)
}

/// Flatten `start` and `sub` records into one row each.
///
/// Substitutions keep their line position so consumers can replay lineup
/// changes against the play table.
pub fn project_lineups(records: &[Keyed<(LineupRecord, bool)>]) -> Result<DataFrame> {
    let rows = ordered_by_game(records);

    let columns: Vec<Column> = vec![
        game_id_column(&rows),
        line_number_column(&rows),
        Series::new(
            "is_substitution".into(),
            rows.iter().map(|r| r.record.1).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "player_id".into(),
            rows.iter()
                .map(|r| r.record.0.player_id.clone())
                .collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "player_name".into(),
            rows.iter()
                .map(|r| r.record.0.player_name.clone())
                .collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "team_side".into(),
            rows.iter()
                .map(|r| r.record.0.team_side.map(|side| side.code()))
                .collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "batting_order".into(),
            rows.iter()
                .map(|r| r.record.0.batting_order.map(u32::from))
                .collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "field_position".into(),
            rows.iter()
                .map(|r| r.record.0.field_position.map(|p| p.code()))
                .collect::<Vec<_>>(),
        )
        .into(),
        source_year_column(&rows),
        source_type_column(&rows),
    ];

    Ok(DataFrame::new(columns)?)
}

/// Flatten `data` records (earned runs) into one row each.
pub fn project_data(records: &[Keyed<DataRecord>]) -> Result<DataFrame> {
    let rows = ordered_by_game(records);

    let columns: Vec<Column> = vec![
        game_id_column(&rows),
        line_number_column(&rows),
        Series::new(
            "data_type".into(),
            rows.iter()
                .map(|r| r.record.data_type.clone())
                .collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "player_id".into(),
            rows.iter()
                .map(|r| r.record.player_id.clone())
                .collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "numeric_value".into(),
            rows.iter()
                .map(|r| r.record.numeric_value)
                .collect::<Vec<_>>(),
        )
        .into(),
        source_year_column(&rows),
        source_type_column(&rows),
    ];

    Ok(DataFrame::new(columns)?)
}

/// Group rows by game (first-seen order), line order within a game.
fn ordered_by_game<T>(records: &[Keyed<T>]) -> Vec<&Keyed<T>> {
    let mut first_seen: HashMap<&Option<String>, usize> = HashMap::new();
    for keyed in records {
        let next = first_seen.len();
        first_seen.entry(&keyed.game_id).or_insert(next);
    }

    let mut rows: Vec<&Keyed<T>> = records.iter().collect();
    rows.sort_by_key(|keyed| (first_seen[&keyed.game_id], keyed.line_number));
    rows
}

fn game_id_column<T>(rows: &[&Keyed<T>]) -> Column {
    Series::new(
        GAME_ID_COLUMN.into(),
        rows.iter().map(|r| r.game_id.clone()).collect::<Vec<_>>(),
    )
    .into()
}

fn line_number_column<T>(rows: &[&Keyed<T>]) -> Column {
    Series::new(
        "line_number".into(),
        rows.iter()
            .map(|r| r.line_number as u64)
            .collect::<Vec<_>>(),
    )
    .into()
}

fn source_year_column<T>(rows: &[&Keyed<T>]) -> Column {
    Series::new(
        "source_year".into(),
        rows.iter().map(|r| r.source.year).collect::<Vec<_>>(),
    )
    .into()
}

fn source_type_column<T>(rows: &[&Keyed<T>]) -> Column {
    Series::new(
        "source_type".into(),
        rows.iter()
            .map(|r| r.source.source_type.as_str())
            .collect::<Vec<_>>(),
    )
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventSource, SourceType, TeamSide};

    const SOURCE: EventSource = EventSource {
        year: 2023,
        source_type: SourceType::Season,
    };

    fn info(line: usize, game: &str, info_type: &str, value: &str) -> Keyed<InfoRecord> {
        Keyed {
            line_number: line,
            game_id: Some(game.to_string()),
            source: SOURCE,
            record: InfoRecord {
                info_type: Some(info_type.to_string()),
                info_value: Some(value.to_string()),
            },
        }
    }

    fn play(line: usize, game: Option<&str>, event: Option<&str>) -> Keyed<PlayRecord> {
        Keyed {
            line_number: line,
            game_id: game.map(str::to_string),
            source: SOURCE,
            record: PlayRecord {
                inning: Some(1),
                team_side: Some(TeamSide::Visiting),
                player_id: Some("judga001".to_string()),
                count: None,
                pitch_sequence: None,
                event: event.map(str::to_string),
            },
        }
    }

    fn strings(df: &DataFrame, column: &str) -> Vec<Option<String>> {
        df.column(column)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    #[test]
    fn test_metadata_union_of_columns() {
        let records = vec![
            info(2, "A", "visteam", "BOS"),
            info(3, "A", "hometeam", "NYA"),
            info(10, "B", "visteam", "TOR"),
        ];
        let df = project_metadata(&records).unwrap();

        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["game_id", "visteam", "hometeam"]);
        assert_eq!(df.height(), 2);
        assert_eq!(
            strings(&df, "hometeam"),
            vec![Some("NYA".to_string()), None]
        );
        assert_eq!(
            strings(&df, "game_id"),
            vec![Some("A".to_string()), Some("B".to_string())]
        );
    }

    #[test]
    fn test_metadata_first_occurrence_wins() {
        let records = vec![
            info(2, "A", "umphome", "first"),
            info(3, "A", "umphome", "second"),
        ];
        let df = project_metadata(&records).unwrap();
        assert_eq!(strings(&df, "umphome"), vec![Some("first".to_string())]);
    }

    #[test]
    fn test_metadata_column_order_is_stable() {
        let records = vec![
            info(2, "A", "date", "2023/04/07"),
            info(3, "B", "site", "NYC21"),
            info(4, "A", "site", "BOS07"),
        ];
        let first = project_metadata(&records).unwrap();
        let second = project_metadata(&records).unwrap();
        assert_eq!(first.get_column_names(), second.get_column_names());
        assert!(first.equals_missing(&second));
    }

    #[test]
    fn test_metadata_game_id_info_type_renamed() {
        let df = project_metadata(&[info(2, "A", "game_id", "x")]).unwrap();
        assert!(df.column("info_game_id").is_ok());
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_metadata_renamed_column_does_not_collide() {
        let df = project_metadata(&[
            info(2, "A", "game_id", "renamed"),
            info(3, "A", "info_game_id", "literal"),
        ])
        .unwrap();

        assert_eq!(df.width(), 3);
        let renamed = df.column("info_game_id").unwrap().str().unwrap().get(0);
        let literal = df.column("info_info_game_id").unwrap().str().unwrap().get(0);
        assert_eq!(renamed, Some("renamed"));
        assert_eq!(literal, Some("literal"));
    }

    #[test]
    fn test_metadata_empty_input() {
        let df = project_metadata(&[]).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 1);
    }

    #[test]
    fn test_plays_keep_every_row() {
        let records = vec![
            play(3, Some("A"), Some("S7")),
            play(4, Some("A"), None),
            play(9, Some("B"), Some("K")),
        ];
        let df = project_plays(&records).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.get_column_names()[0].as_str(), "game_id");
        assert_eq!(
            strings(&df, "event"),
            vec![Some("S7".to_string()), None, Some("K".to_string())]
        );
    }

    #[test]
    fn test_plays_line_order_within_game() {
        let records = vec![
            play(7, Some("A"), Some("second")),
            play(20, Some("B"), Some("other")),
            play(5, Some("A"), Some("first")),
        ];
        let df = project_plays(&records).unwrap();
        assert_eq!(
            strings(&df, "event"),
            vec![
                Some("first".to_string()),
                Some("second".to_string()),
                Some("other".to_string())
            ]
        );
        let lines: Vec<Option<u64>> = df
            .column("line_number")
            .unwrap()
            .u64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(lines, vec![Some(5), Some(7), Some(20)]);
    }

    #[test]
    fn test_plays_without_game_kept() {
        let df = project_plays(&[play(1, None, Some("NP"))]).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(strings(&df, "game_id"), vec![None]);
    }

    #[test]
    fn test_lineups_flag_substitutions() {
        let lineup = LineupRecord {
            player_id: Some("jeted001".to_string()),
            player_name: None,
            team_side: Some(TeamSide::Home),
            batting_order: Some(2),
            field_position: None,
        };
        let records = vec![
            Keyed {
                line_number: 4,
                game_id: Some("A".to_string()),
                source: SOURCE,
                record: (lineup.clone(), false),
            },
            Keyed {
                line_number: 30,
                game_id: Some("A".to_string()),
                source: SOURCE,
                record: (lineup, true),
            },
        ];
        let df = project_lineups(&records).unwrap();
        let flags: Vec<Option<bool>> = df
            .column("is_substitution")
            .unwrap()
            .bool()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(flags, vec![Some(false), Some(true)]);
        assert_eq!(df.column("field_position").unwrap().null_count(), 2);
    }

    #[test]
    fn test_data_rows() {
        let records = vec![Keyed {
            line_number: 80,
            game_id: Some("A".to_string()),
            source: SOURCE,
            record: DataRecord {
                data_type: Some("er".to_string()),
                player_id: Some("coleg001".to_string()),
                numeric_value: Some(3),
            },
        }];
        let df = project_data(&records).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(
            df.column("numeric_value").unwrap().i64().unwrap().get(0),
            Some(3)
        );
    }
}
