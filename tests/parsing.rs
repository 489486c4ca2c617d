use std::fs;
use std::path::PathBuf;

use nhl_corsi::pbp_fetch::parse_play_by_play_json;
use nhl_corsi::shift_fetch::parse_shiftcharts_json;
use nhl_corsi::shift_index::{SHIFT_TYPE_GOAL, ShiftIndex, TeamAssignment};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_play_by_play_fixture() {
    let raw = read_fixture("play_by_play.json");
    let game = parse_play_by_play_json(&raw).expect("fixture should parse");

    let teams = game.teams.expect("fixture carries team metadata");
    assert_eq!(teams.home, "BOS");
    assert_eq!(teams.away, "CHI");

    // 1:1 with the feed, in feed order.
    assert_eq!(game.events.len(), 5);
    assert_eq!(game.events[0].type_code, 520);
    assert_eq!(game.events[1].type_code, 502);
    assert_eq!(game.events[4].type_code, 507);
}

#[test]
fn header_events_lack_ice_context() {
    let raw = read_fixture("play_by_play.json");
    let game = parse_play_by_play_json(&raw).expect("fixture should parse");

    let header = &game.events[0];
    assert_eq!(header.period, None);
    assert_eq!(header.elapsed_seconds, None);
    assert_eq!(header.situation_code, None);
    assert_eq!(header.shooter_id, None);
}

#[test]
fn clocks_convert_to_elapsed_seconds() {
    let raw = read_fixture("play_by_play.json");
    let game = parse_play_by_play_json(&raw).expect("fixture should parse");

    assert_eq!(game.events[1].elapsed_seconds, Some(0));
    assert_eq!(game.events[2].elapsed_seconds, Some(60));
    assert_eq!(game.events[3].elapsed_seconds, Some(330));
    // Malformed clock reads as absent, not as an error.
    assert_eq!(game.events[4].period, Some(2));
    assert_eq!(game.events[4].elapsed_seconds, None);
}

#[test]
fn shooter_falls_back_to_scorer_on_goals() {
    let raw = read_fixture("play_by_play.json");
    let game = parse_play_by_play_json(&raw).expect("fixture should parse");

    assert_eq!(game.events[2].shooter_id, Some(101));
    assert_eq!(game.events[3].shooter_id, Some(107));
    assert_eq!(game.events[1].shooter_id, None);
}

#[test]
fn situation_codes_decode_from_strings() {
    let raw = read_fixture("play_by_play.json");
    let game = parse_play_by_play_json(&raw).expect("fixture should parse");

    assert_eq!(game.events[1].situation_code, Some(1551));
    assert_eq!(game.events[4].situation_code, Some(1451));
}

#[test]
fn teams_absent_without_metadata() {
    let game = parse_play_by_play_json(r#"{"plays": []}"#).expect("minimal payload should parse");
    assert!(game.teams.is_none());
    assert!(game.events.is_empty());
}

#[test]
fn parses_shiftcharts_fixture() {
    let raw = read_fixture("shiftcharts.json");
    let shifts = parse_shiftcharts_json(&raw).expect("fixture should parse");

    assert_eq!(shifts.len(), 5);
    assert_eq!(shifts[0].player_id, 101);
    assert_eq!(shifts[0].first_name.as_deref(), Some("Brad"));
    assert_eq!(shifts[0].last_name.as_deref(), Some("Marchand"));
    assert_eq!(shifts[0].team_abbrev, "BOS");
    assert_eq!(shifts[0].start_time.as_deref(), Some("00:00"));
    assert_eq!(shifts[0].end_time.as_deref(), Some("01:30"));
    // Goal pseudo-rows survive parsing; the index drops them.
    assert_eq!(shifts[3].type_code, SHIFT_TYPE_GOAL);
}

#[test]
fn goal_rows_are_parsed_but_never_indexed() {
    let raw = read_fixture("shiftcharts.json");
    let shifts = parse_shiftcharts_json(&raw).expect("fixture should parse");
    let index = ShiftIndex::build(&shifts);

    assert_eq!(index.interval_count(), 4);
    // Player 107's only row is the goal marker.
    assert!(!index.on_ice("BOS", 1, 330).contains(&107));
}

#[test]
fn first_seen_shift_team_is_home_fallback() {
    let raw = read_fixture("shiftcharts.json");
    let shifts = parse_shiftcharts_json(&raw).expect("fixture should parse");
    let teams = TeamAssignment::from_shift_order(&shifts).expect("two teams in fixture");
    assert_eq!(teams.home, "BOS");
    assert_eq!(teams.away, "CHI");
}

#[test]
fn empty_shift_data_is_not_an_error() {
    let shifts = parse_shiftcharts_json(r#"{"data": []}"#).expect("empty data should parse");
    assert!(shifts.is_empty());
    assert!(ShiftIndex::build(&shifts).is_empty());
}

#[test]
fn malformed_shift_rows_are_rejected_at_ingestion() {
    // Required playerId missing.
    let raw = r#"{"data": [{"teamAbbrev": "BOS", "period": 1, "typeCode": 517}]}"#;
    assert!(parse_shiftcharts_json(raw).is_err());
}
