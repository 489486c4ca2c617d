use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shift_index::{ShiftIndex, TeamAssignment};

/// One play-by-play event, already flattened and in chronological order.
/// Header and period-boundary events legitimately lack a period or clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayEvent {
    pub period: Option<u32>,
    pub elapsed_seconds: Option<u32>,
    pub type_code: u16,
    pub situation_code: Option<u16>,
    pub shooter_id: Option<i64>,
}

/// A play event with the on-ice picture attached, 1:1 with its source event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedEvent {
    pub event: PlayEvent,
    pub home_on_ice: Vec<i64>,
    pub away_on_ice: Vec<i64>,
    pub home_count: usize,
    pub away_count: usize,
}

/// Resolve the on-ice sets for every event. Strictly 1:1 and
/// order-preserving: position k of the output corresponds to position k of
/// the input. Each event resolves independently, so the pass runs in
/// parallel; the indexed collect keeps input order.
pub fn enrich_events(
    events: &[PlayEvent],
    index: &ShiftIndex,
    teams: &TeamAssignment,
) -> Vec<EnrichedEvent> {
    events
        .par_iter()
        .map(|event| enrich_one(event, index, teams))
        .collect()
}

fn enrich_one(event: &PlayEvent, index: &ShiftIndex, teams: &TeamAssignment) -> EnrichedEvent {
    let (Some(period), Some(second)) = (event.period, event.elapsed_seconds) else {
        // No ice context; not an error.
        return EnrichedEvent {
            event: event.clone(),
            home_on_ice: Vec::new(),
            away_on_ice: Vec::new(),
            home_count: 0,
            away_count: 0,
        };
    };
    let home_on_ice = index.on_ice(&teams.home, period, second);
    let away_on_ice = index.on_ice(&teams.away, period, second);
    let home_count = home_on_ice.len();
    let away_count = away_on_ice.len();
    EnrichedEvent {
        event: event.clone(),
        home_on_ice,
        away_on_ice,
        home_count,
        away_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shift_index::ShiftRecord;

    fn shift(player_id: i64, team: &str, start: &str, end: &str) -> ShiftRecord {
        ShiftRecord {
            player_id,
            first_name: None,
            last_name: None,
            team_abbrev: team.to_string(),
            team_name: None,
            period: 1,
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
            type_code: 517,
        }
    }

    fn event(period: Option<u32>, second: Option<u32>) -> PlayEvent {
        PlayEvent {
            period,
            elapsed_seconds: second,
            type_code: 506,
            situation_code: Some(1551),
            shooter_id: None,
        }
    }

    #[test]
    fn missing_period_or_clock_enriches_empty() {
        let index = ShiftIndex::build(&[shift(1, "BOS", "00:00", "01:00")]);
        let teams = TeamAssignment {
            home: "BOS".to_string(),
            away: "CHI".to_string(),
        };
        let enriched = enrich_events(&[event(None, Some(30)), event(Some(1), None)], &index, &teams);
        assert_eq!(enriched.len(), 2);
        for row in &enriched {
            assert!(row.home_on_ice.is_empty());
            assert!(row.away_on_ice.is_empty());
            assert_eq!(row.home_count, 0);
            assert_eq!(row.away_count, 0);
        }
    }

    #[test]
    fn resolves_both_sides() {
        let index = ShiftIndex::build(&[
            shift(1, "BOS", "00:00", "01:00"),
            shift(2, "BOS", "00:00", "01:00"),
            shift(7, "CHI", "00:00", "01:00"),
        ]);
        let teams = TeamAssignment {
            home: "BOS".to_string(),
            away: "CHI".to_string(),
        };
        let enriched = enrich_events(&[event(Some(1), Some(30))], &index, &teams);
        assert_eq!(enriched[0].home_on_ice, vec![1, 2]);
        assert_eq!(enriched[0].away_on_ice, vec![7]);
        assert_eq!(enriched[0].home_count, 2);
        assert_eq!(enriched[0].away_count, 1);
    }
}
