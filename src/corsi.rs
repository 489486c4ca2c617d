use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::enrich::EnrichedEvent;
use crate::shift_index::TeamAssignment;

pub const TYPE_GOAL: u16 = 505;
pub const TYPE_SHOT_ON_GOAL: u16 = 506;
pub const TYPE_MISSED_SHOT: u16 = 507;
pub const TYPE_BLOCKED_SHOT: u16 = 508;

/// situationCode for five skaters plus a goaltender on both sides.
pub const SITUATION_FULL_STRENGTH: u16 = 1551;

/// Skaters plus goaltender per side at full strength.
const FULL_STRENGTH_ON_ICE: usize = 6;

/// True 5-on-5 shot attempt. The situation code is trusted event data while
/// the on-ice counts are derived independently from shift records; both must
/// agree, so a gap in shift coverage excludes the event instead of being
/// papered over.
pub fn is_full_strength_attempt(event: &EnrichedEvent) -> bool {
    matches!(
        event.event.type_code,
        TYPE_GOAL | TYPE_SHOT_ON_GOAL | TYPE_MISSED_SHOT | TYPE_BLOCKED_SHOT
    ) && event.event.situation_code == Some(SITUATION_FULL_STRENGTH)
        && event.home_count == FULL_STRENGTH_ON_ICE
        && event.away_count == FULL_STRENGTH_ON_ICE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy)]
struct PlayerTally {
    side: Side,
    cf: u32,
    ca: u32,
    attempts: u32,
}

/// A qualifying attempt whose shooter could not be placed on either on-ice
/// set. Excluded from every tally, but kept visible for audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedAttempt {
    pub event_index: usize,
    pub shooter_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerCorsiStat {
    pub player_id: i64,
    pub team: String,
    pub cf: u32,
    pub ca: u32,
    pub attempts: u32,
    pub corsi_pct: f64,
    pub corsi_rel: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsiReport {
    /// Finalized stats, stable-sorted by Corsi% descending.
    pub players: Vec<PlayerCorsiStat>,
    pub qualifying_events: usize,
    pub skipped: Vec<SkippedAttempt>,
}

/// Accumulation half of the two-phase reduce: tallies mutate event by event,
/// percentages exist only after `finalize`.
#[derive(Debug, Default)]
pub struct CorsiAccumulator {
    stats: HashMap<i64, PlayerTally>,
    order: Vec<i64>,
    qualifying: usize,
    skipped: Vec<SkippedAttempt>,
}

impl CorsiAccumulator {
    /// Single forward pass over the enriched stream, filtering to true
    /// 5-on-5 shot attempts.
    pub fn accumulate(events: &[EnrichedEvent]) -> CorsiAccumulator {
        let mut acc = CorsiAccumulator::default();
        for (event_index, event) in events.iter().enumerate() {
            if is_full_strength_attempt(event) {
                acc.record(event_index, event);
            }
        }
        acc
    }

    /// Tally one qualifying attempt. Every player on either side gains an
    /// attempt; the shooting team's players gain CF, the opponents CA.
    pub fn record(&mut self, event_index: usize, event: &EnrichedEvent) {
        let shooting_side = match event.event.shooter_id {
            Some(shooter_id) if event.home_on_ice.contains(&shooter_id) => Side::Home,
            Some(shooter_id) if event.away_on_ice.contains(&shooter_id) => Side::Away,
            shooter_id => {
                self.skipped.push(SkippedAttempt {
                    event_index,
                    shooter_id,
                });
                return;
            }
        };

        self.qualifying += 1;
        for &player_id in &event.home_on_ice {
            self.tally(player_id, Side::Home, shooting_side);
        }
        for &player_id in &event.away_on_ice {
            self.tally(player_id, Side::Away, shooting_side);
        }
    }

    fn tally(&mut self, player_id: i64, side: Side, shooting_side: Side) {
        let entry = self.stats.entry(player_id).or_insert_with(|| {
            self.order.push(player_id);
            PlayerTally {
                side,
                cf: 0,
                ca: 0,
                attempts: 0,
            }
        });
        if side == shooting_side {
            entry.cf += 1;
        } else {
            entry.ca += 1;
        }
        entry.attempts += 1;
    }

    /// Fold another shard into this one. CF, CA, and attempts add
    /// commutatively, so shards may be reduced in any order; percentages are
    /// derived once, after the full reduce.
    pub fn merge(&mut self, other: CorsiAccumulator) {
        for player_id in other.order {
            let tally = other.stats[&player_id];
            match self.stats.entry(player_id) {
                std::collections::hash_map::Entry::Occupied(mut entry) => {
                    let mine = entry.get_mut();
                    mine.cf += tally.cf;
                    mine.ca += tally.ca;
                    mine.attempts += tally.attempts;
                }
                std::collections::hash_map::Entry::Vacant(entry) => {
                    entry.insert(tally);
                    self.order.push(player_id);
                }
            }
        }
        self.qualifying += other.qualifying;
        self.skipped.extend(other.skipped);
    }

    /// Derive percentages, team means, and relative Corsi, then order the
    /// table by Corsi% descending (stable, so first-sighting order breaks
    /// ties).
    pub fn finalize(self, teams: &TeamAssignment) -> CorsiReport {
        let mut players: Vec<PlayerCorsiStat> = self
            .order
            .iter()
            .map(|player_id| {
                let tally = self.stats[player_id];
                let team = match tally.side {
                    Side::Home => teams.home.clone(),
                    Side::Away => teams.away.clone(),
                };
                let total = tally.cf + tally.ca;
                let corsi_pct = if total > 0 {
                    round1(f64::from(tally.cf) / f64::from(total) * 100.0)
                } else {
                    0.0
                };
                PlayerCorsiStat {
                    player_id: *player_id,
                    team,
                    cf: tally.cf,
                    ca: tally.ca,
                    attempts: tally.attempts,
                    corsi_pct,
                    corsi_rel: 0.0,
                }
            })
            .collect();

        let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
        for stat in &players {
            let entry = sums.entry(stat.team.as_str()).or_insert((0.0, 0));
            entry.0 += stat.corsi_pct;
            entry.1 += 1;
        }
        let means: HashMap<String, f64> = sums
            .into_iter()
            .map(|(team, (sum, count))| (team.to_string(), sum / count as f64))
            .collect();
        for stat in &mut players {
            let mean = means.get(&stat.team).copied().unwrap_or(0.0);
            stat.corsi_rel = round1(stat.corsi_pct - mean);
        }

        players.sort_by(|a, b| b.corsi_pct.total_cmp(&a.corsi_pct));

        CorsiReport {
            players,
            qualifying_events: self.qualifying,
            skipped: self.skipped,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamTotals {
    pub team: String,
    pub cf: u32,
    pub ca: u32,
    pub corsi_pct: f64,
}

/// Per-team CF/CA sums over the player table, with the team share of
/// attempts. Used by the summary printer.
pub fn team_totals(players: &[PlayerCorsiStat]) -> Vec<TeamTotals> {
    let mut order: Vec<&str> = Vec::new();
    let mut sums: HashMap<&str, (u32, u32)> = HashMap::new();
    for stat in players {
        let entry = sums.entry(stat.team.as_str()).or_insert_with(|| {
            order.push(stat.team.as_str());
            (0, 0)
        });
        entry.0 += stat.cf;
        entry.1 += stat.ca;
    }
    order
        .into_iter()
        .map(|team| {
            let (cf, ca) = sums[team];
            let total = cf + ca;
            let corsi_pct = if total > 0 {
                round1(f64::from(cf) / f64::from(total) * 100.0)
            } else {
                0.0
            };
            TeamTotals {
                team: team.to_string(),
                cf,
                ca,
                corsi_pct,
            }
        })
        .collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(round1(33.333_333), 33.3);
        assert_eq!(round1(66.666_666), 66.7);
        assert_eq!(round1(0.0), 0.0);
        assert_eq!(round1(-3.14), -3.1);
    }

    #[test]
    fn empty_accumulator_finalizes_empty() {
        let teams = TeamAssignment {
            home: "BOS".to_string(),
            away: "CHI".to_string(),
        };
        let report = CorsiAccumulator::default().finalize(&teams);
        assert!(report.players.is_empty());
        assert_eq!(report.qualifying_events, 0);
        assert!(report.skipped.is_empty());
    }
}
