use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::clock::clock_seconds;

/// Shift-chart rows with this type code are goal markers, not shifts.
pub const SHIFT_TYPE_GOAL: u16 = 505;

/// One row of the shift source, as delivered by the shift-chart feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftRecord {
    pub player_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub team_abbrev: String,
    pub team_name: Option<String>,
    pub period: u32,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub type_code: u16,
}

/// A player's presence window within one period, in elapsed seconds.
/// Invariant: start_seconds <= end_seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftInterval {
    pub player_id: i64,
    pub period: u32,
    pub start_seconds: u32,
    pub end_seconds: u32,
}

/// Explicit home/away designation for the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamAssignment {
    pub home: String,
    pub away: String,
}

impl TeamAssignment {
    /// Fallback when game metadata carries no designation: the first team
    /// abbreviation seen in the shift stream is taken as home. Order in the
    /// feed is not contractual, so callers should prefer an explicit
    /// assignment whenever one is available.
    pub fn from_shift_order(records: &[ShiftRecord]) -> Option<TeamAssignment> {
        let mut home: Option<&str> = None;
        for record in records {
            match home {
                None => home = Some(&record.team_abbrev),
                Some(first) if first != record.team_abbrev => {
                    return Some(TeamAssignment {
                        home: first.to_string(),
                        away: record.team_abbrev.clone(),
                    });
                }
                Some(_) => {}
            }
        }
        None
    }
}

/// Presence intervals grouped by (team, period), built once per game.
#[derive(Debug, Clone, Default)]
pub struct ShiftIndex {
    groups: HashMap<String, Vec<ShiftInterval>>,
    intervals: usize,
}

impl ShiftIndex {
    /// Goal markers, rows with unparseable clocks, and rows whose end
    /// precedes their start are all left out of the index.
    pub fn build(records: &[ShiftRecord]) -> ShiftIndex {
        let mut groups: HashMap<String, Vec<ShiftInterval>> = HashMap::new();
        let mut intervals = 0usize;
        for record in records {
            if record.type_code == SHIFT_TYPE_GOAL {
                continue;
            }
            let Some(start_seconds) = clock_seconds(record.start_time.as_deref()) else {
                continue;
            };
            let Some(end_seconds) = clock_seconds(record.end_time.as_deref()) else {
                continue;
            };
            if end_seconds < start_seconds {
                continue;
            }
            groups
                .entry(group_key(&record.team_abbrev, record.period))
                .or_default()
                .push(ShiftInterval {
                    player_id: record.player_id,
                    period: record.period,
                    start_seconds,
                    end_seconds,
                });
            intervals += 1;
        }
        ShiftIndex { groups, intervals }
    }

    /// Players on the ice for `team` at elapsed `second` of `period`.
    ///
    /// An interval [start, end] covers the instant iff start < second <= end:
    /// an event at the exact start second is not yet covered, one at the
    /// exact end second still is. Results keep shift-stream order and list
    /// each player at most once.
    pub fn on_ice(&self, team: &str, period: u32, second: u32) -> Vec<i64> {
        let Some(intervals) = self.groups.get(&group_key(team, period)) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        let mut players = Vec::new();
        for interval in intervals {
            if interval.start_seconds < second
                && second <= interval.end_seconds
                && seen.insert(interval.player_id)
            {
                players.push(interval.player_id);
            }
        }
        players
    }

    pub fn interval_count(&self) -> usize {
        self.intervals
    }

    pub fn is_empty(&self) -> bool {
        self.intervals == 0
    }
}

fn group_key(team: &str, period: u32) -> String {
    format!("{team}|{period}")
}
