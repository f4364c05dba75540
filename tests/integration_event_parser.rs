//! Integration tests for the event file pipeline
//!
//! Exercise the public API end to end: tokenize, stamp game ids, decode,
//! project into DataFrames.

use retrosheet_processor::decoders::{LineupRecord, PlayRecord, decode_all};
use retrosheet_processor::models::{EventSource, SourceType, TeamSide};
use retrosheet_processor::tokenizer::tokenize_file;
use retrosheet_processor::{
    StructuredRecord, assign_game_ids, decode, parse_event_file, project_metadata, project_plays,
    tokenize,
};

fn source() -> EventSource {
    EventSource::new(2023, SourceType::Season)
}

fn strings(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

#[test]
fn test_three_line_game() {
    let content = "id,NYA202304070\nversion,2\nplay,1,0,judga001,22,BCFBX,S7";
    let parsed = parse_event_file("2023NYA.EVA", content, source());

    assert!(parsed.errors().is_empty());
    assert!(parsed.orphans.is_empty());
    assert_eq!(parsed.record_count(), 3);

    let identities = parsed.batch.game_identities();
    assert_eq!(identities.len(), 1);
    assert_eq!(
        identities[0].record.game_id.as_deref(),
        Some("NYA202304070")
    );

    let versions = parsed
        .batch
        .records
        .iter()
        .filter(|keyed| matches!(keyed.record, StructuredRecord::Version(_)))
        .count();
    assert_eq!(versions, 1);

    let plays = parsed.batch.play_records();
    assert_eq!(plays.len(), 1);
    let play = &plays[0];
    assert_eq!(play.game_id.as_deref(), Some("NYA202304070"));
    assert_eq!(play.line_number, 3);
    assert_eq!(play.record.inning, Some(1));
    assert_eq!(play.record.team_side, Some(TeamSide::Visiting));
    assert_eq!(play.record.player_id.as_deref(), Some("judga001"));
    assert_eq!(play.record.event.as_deref(), Some("S7"));
}

#[test]
fn test_tokenize_respects_quotes() {
    let (record_type, fields) =
        tokenize(r#"com,"Judge, first homer of the year""#).expect("non-blank line");
    assert_eq!(record_type, "com");
    assert_eq!(fields.len(), 1);

    let (_, fields) = tokenize("play,1,0,judga001,22,BCFBX,S7").expect("non-blank line");
    assert_eq!(fields.len(), 6);

    assert!(tokenize("").is_none());
}

#[test]
fn test_game_id_assignment_is_idempotent() {
    let content = "id,NYA202304070\nplay,1,0,a,00,,K\nid,BOS202304081\nplay,1,1,b,00,,W";
    let once = assign_game_ids(tokenize_file(content, source()));
    let twice = assign_game_ids(once.clone());

    let ids = |records: &[retrosheet_processor::RawRecord]| {
        records
            .iter()
            .map(|r| r.game_id.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&once), ids(&twice));
    assert_eq!(once[3].game_id.as_deref(), Some("BOS202304081"));
}

#[test]
fn test_play_decoding() {
    let decoded = decode("play", &strings(&["1", "0", "jeted001", "32", "BCFBX", "S7"]));
    assert!(decoded.issues.is_empty());
    assert_eq!(
        decoded.record,
        StructuredRecord::Play(PlayRecord {
            inning: Some(1),
            team_side: Some(TeamSide::Visiting),
            player_id: Some("jeted001".to_string()),
            count: Some("32".to_string()),
            pitch_sequence: Some("BCFBX".to_string()),
            event: Some("S7".to_string()),
        })
    );
}

#[test]
fn test_short_lineup_is_not_an_error() {
    let decoded = decode("start", &strings(&["jeted001"]));
    assert!(decoded.issues.is_empty());
    assert_eq!(
        decoded.record,
        StructuredRecord::Start(LineupRecord {
            player_id: Some("jeted001".to_string()),
            player_name: None,
            team_side: None,
            batting_order: None,
            field_position: None,
        })
    );
}

#[test]
fn test_unknown_record_type_falls_back() {
    let decoded = decode("foo", &strings(&["a", "b"]));
    assert!(decoded.issues.is_empty());
    assert_eq!(decoded.record, StructuredRecord::Opaque("a,b".to_string()));
}

#[test]
fn test_metadata_missing_info_is_null() {
    let content = "\
id,NYA202304070
info,visteam,PHI
info,hometeam,NYA
id,BOS202304081
info,visteam,NYA
";
    let records = assign_game_ids(tokenize_file(content, source()));
    let batch = decode_all(&records);
    let df = project_metadata(&batch.info_records()).unwrap();

    assert_eq!(df.height(), 2);
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, vec!["game_id", "visteam", "hometeam"]);

    let hometeam = df.column("hometeam").unwrap().str().unwrap();
    assert_eq!(hometeam.get(0), Some("NYA"));
    assert_eq!(hometeam.get(1), None);
}

#[test]
fn test_no_plays_dropped() {
    let content = "\
play,1,0,early001,00,,K
id,NYA202304070
play,1,0,a,00,,K
play,
play,x,y
com,\"between plays\"
play,2,1,b,12,BCX,S8
id,BOS202304081
play,1,0,c,??,,HR
";
    let raw = assign_game_ids(tokenize_file(content, source()));
    let raw_plays = raw.iter().filter(|r| r.record_type == "play").count();

    let batch = decode_all(&raw);
    let df = project_plays(&batch.play_records()).unwrap();
    assert_eq!(df.height(), raw_plays);
    assert!(!batch.errors.is_empty());
}
