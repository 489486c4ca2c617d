use anyhow::{Context, Result};
use serde::Deserialize;

use crate::http::{fetch_json_cached, http_client};
use crate::shift_index::ShiftRecord;

const SHIFTCHARTS_URL: &str = "https://api.nhle.com/stats/rest/en/shiftcharts";

pub fn fetch_shifts(game_id: u64) -> Result<Vec<ShiftRecord>> {
    let client = http_client()?;
    let url = format!("{SHIFTCHARTS_URL}?cayenneExp=gameId={game_id}");
    let body = fetch_json_cached(client, &url)
        .with_context(|| format!("shift-chart fetch failed for game {game_id}"))?;
    parse_shiftcharts_json(&body)
}

#[derive(Debug, Deserialize)]
struct ShiftChartsResponse {
    #[serde(default)]
    data: Vec<RawShift>,
}

// A row missing one of the required fields fails deserialization; structural
// problems in the feed are rejected here, not deeper in the pipeline.
#[derive(Debug, Deserialize)]
struct RawShift {
    #[serde(rename = "playerId")]
    player_id: i64,
    #[serde(rename = "firstName", default)]
    first_name: Option<String>,
    #[serde(rename = "lastName", default)]
    last_name: Option<String>,
    #[serde(rename = "teamAbbrev")]
    team_abbrev: String,
    #[serde(rename = "teamName", default)]
    team_name: Option<String>,
    period: u32,
    #[serde(rename = "startTime", default)]
    start_time: Option<String>,
    #[serde(rename = "endTime", default)]
    end_time: Option<String>,
    #[serde(rename = "typeCode")]
    type_code: u16,
}

/// An empty `data` array is a valid (if useless) game: the interval index
/// comes out empty and every event enriches to empty on-ice sets.
pub fn parse_shiftcharts_json(raw: &str) -> Result<Vec<ShiftRecord>> {
    let parsed: ShiftChartsResponse =
        serde_json::from_str(raw.trim()).context("invalid shift-chart json")?;
    Ok(parsed
        .data
        .into_iter()
        .map(|row| ShiftRecord {
            player_id: row.player_id,
            first_name: row.first_name,
            last_name: row.last_name,
            team_abbrev: row.team_abbrev,
            team_name: row.team_name,
            period: row.period,
            start_time: row.start_time,
            end_time: row.end_time,
            type_code: row.type_code,
        })
        .collect())
}
