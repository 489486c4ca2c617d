use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::clock::clock_seconds;
use crate::enrich::PlayEvent;
use crate::http::{fetch_json_cached, http_client};
use crate::shift_index::TeamAssignment;

const GAMECENTER_BASE: &str = "https://api-web.nhle.com/v1/gamecenter";

/// The flattened play-by-play feed: events in chronological order plus the
/// explicit home/away designation from the game metadata, when present.
#[derive(Debug, Clone)]
pub struct GameEvents {
    pub teams: Option<TeamAssignment>,
    pub events: Vec<PlayEvent>,
}

pub fn fetch_play_by_play(game_id: u64) -> Result<GameEvents> {
    let client = http_client()?;
    let url = format!("{GAMECENTER_BASE}/{game_id}/play-by-play");
    let body = fetch_json_cached(client, &url)
        .with_context(|| format!("play-by-play fetch failed for game {game_id}"))?;
    parse_play_by_play_json(&body)
}

#[derive(Debug, Deserialize)]
struct PlayByPlayResponse {
    #[serde(rename = "homeTeam")]
    home_team: Option<TeamRef>,
    #[serde(rename = "awayTeam")]
    away_team: Option<TeamRef>,
    #[serde(default)]
    plays: Vec<RawPlay>,
}

#[derive(Debug, Deserialize)]
struct TeamRef {
    abbrev: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPlay {
    #[serde(rename = "periodDescriptor", default)]
    period_descriptor: Option<PeriodDescriptor>,
    #[serde(rename = "timeInPeriod", default)]
    time_in_period: Option<String>,
    #[serde(rename = "typeCode")]
    type_code: u16,
    #[serde(rename = "situationCode", default)]
    situation_code: Option<Value>,
    #[serde(default)]
    details: Option<PlayDetails>,
}

#[derive(Debug, Deserialize)]
struct PeriodDescriptor {
    number: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct PlayDetails {
    #[serde(rename = "shootingPlayerId")]
    shooting_player_id: Option<i64>,
    #[serde(rename = "scoringPlayerId")]
    scoring_player_id: Option<i64>,
}

/// Flatten the gamecenter payload into ordered `PlayEvent`s. No event is
/// dropped: rows without a period or clock come through with those fields
/// absent and enrich to empty on-ice sets downstream.
pub fn parse_play_by_play_json(raw: &str) -> Result<GameEvents> {
    let parsed: PlayByPlayResponse =
        serde_json::from_str(raw.trim()).context("invalid play-by-play json")?;

    let teams = match (team_abbrev(parsed.home_team), team_abbrev(parsed.away_team)) {
        (Some(home), Some(away)) => Some(TeamAssignment { home, away }),
        _ => None,
    };

    let events = parsed
        .plays
        .into_iter()
        .map(|play| {
            let details = play.details.unwrap_or_default();
            PlayEvent {
                period: play.period_descriptor.and_then(|d| d.number),
                elapsed_seconds: clock_seconds(play.time_in_period.as_deref()),
                type_code: play.type_code,
                situation_code: play.situation_code.as_ref().and_then(code_from_value),
                // Goals carry the scorer, not a shooter.
                shooter_id: details.shooting_player_id.or(details.scoring_player_id),
            }
        })
        .collect();

    Ok(GameEvents { teams, events })
}

fn team_abbrev(team: Option<TeamRef>) -> Option<String> {
    let abbrev = team?.abbrev?;
    let abbrev = abbrev.trim();
    if abbrev.is_empty() {
        None
    } else {
        Some(abbrev.to_string())
    }
}

// The gamecenter feed serves situationCode as a string ("1551"); derived
// datasets carry it numeric. Accept both.
fn code_from_value(value: &Value) -> Option<u16> {
    if let Some(raw) = value.as_str() {
        return raw.trim().parse().ok();
    }
    value.as_u64().and_then(|n| u16::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn situation_code_accepts_string_and_number() {
        assert_eq!(code_from_value(&json!("1551")), Some(1551));
        assert_eq!(code_from_value(&json!(1551)), Some(1551));
        assert_eq!(code_from_value(&json!(" 1451 ")), Some(1451));
        assert_eq!(code_from_value(&json!("n/a")), None);
        assert_eq!(code_from_value(&json!(null)), None);
        assert_eq!(code_from_value(&json!(70000)), None);
    }
}
