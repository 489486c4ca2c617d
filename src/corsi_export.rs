use std::path::Path;

use anyhow::{Context, Result};

use crate::corsi::CorsiReport;
use crate::enrich::EnrichedEvent;
use crate::player_directory::{PlayerDirectory, PlayerInfo};
use crate::shift_index::ShiftRecord;

/// Corsi table in the downstream column order: playerId, playerName, team,
/// CF, CA, CF_plus_CA, Corsi_pct, Corsi_rel, TOI_events.
pub fn write_corsi_csv(
    path: &Path,
    report: &CorsiReport,
    directory: &PlayerDirectory,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create corsi csv {}", path.display()))?;
    writer.write_record([
        "playerId",
        "playerName",
        "team",
        "CF",
        "CA",
        "CF_plus_CA",
        "Corsi_pct",
        "Corsi_rel",
        "TOI_events",
    ])?;
    for stat in &report.players {
        writer.write_record([
            stat.player_id.to_string(),
            directory.player_name(stat.player_id).to_string(),
            stat.team.clone(),
            stat.cf.to_string(),
            stat.ca.to_string(),
            (stat.cf + stat.ca).to_string(),
            format!("{:.1}", stat.corsi_pct),
            format!("{:.1}", stat.corsi_rel),
            stat.attempts.to_string(),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("flush corsi csv {}", path.display()))?;
    Ok(())
}

/// Enriched event stream, one row per event in input order. On-ice lists are
/// rendered as `[id, id, ...]`.
pub fn write_enriched_csv(path: &Path, events: &[EnrichedEvent]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create enriched csv {}", path.display()))?;
    writer.write_record([
        "periodNumber",
        "elapsedSeconds",
        "typeCode",
        "situationCode",
        "shooterId",
        "homePlayersOnIce",
        "awayPlayersOnIce",
        "homePlayersCount",
        "awayPlayersCount",
    ])?;
    for row in events {
        writer.write_record([
            opt_to_string(row.event.period),
            opt_to_string(row.event.elapsed_seconds),
            row.event.type_code.to_string(),
            opt_to_string(row.event.situation_code),
            opt_to_string(row.event.shooter_id),
            format!("{:?}", row.home_on_ice),
            format!("{:?}", row.away_on_ice),
            row.home_count.to_string(),
            row.away_count.to_string(),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("flush enriched csv {}", path.display()))?;
    Ok(())
}

/// Raw shift dump for the `shift_dump` binary.
pub fn write_shifts_csv(path: &Path, records: &[ShiftRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create shifts csv {}", path.display()))?;
    writer.write_record([
        "playerId",
        "firstName",
        "lastName",
        "teamAbbrev",
        "teamName",
        "period",
        "startTime",
        "endTime",
        "typeCode",
    ])?;
    for record in records {
        writer.write_record([
            record.player_id.to_string(),
            record.first_name.clone().unwrap_or_default(),
            record.last_name.clone().unwrap_or_default(),
            record.team_abbrev.clone(),
            record.team_name.clone().unwrap_or_default(),
            record.period.to_string(),
            record.start_time.clone().unwrap_or_default(),
            record.end_time.clone().unwrap_or_default(),
            record.type_code.to_string(),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("flush shifts csv {}", path.display()))?;
    Ok(())
}

/// Player directory in CSV form, sorted by player id for stable output.
pub fn write_players_csv(path: &Path, directory: &PlayerDirectory) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create players csv {}", path.display()))?;
    writer.write_record([
        "playerId",
        "fullName",
        "firstName",
        "lastName",
        "team",
        "teamName",
    ])?;
    let mut rows: Vec<(i64, &PlayerInfo)> = directory.iter().collect();
    rows.sort_by_key(|(player_id, _)| *player_id);
    for (player_id, info) in rows {
        writer.write_record([
            player_id.to_string(),
            info.full_name.clone(),
            info.first_name.clone(),
            info.last_name.clone(),
            info.team.clone(),
            info.team_name.clone(),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("flush players csv {}", path.display()))?;
    Ok(())
}

fn opt_to_string<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
