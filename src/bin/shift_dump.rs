use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};

use nhl_corsi::corsi_export::write_shifts_csv;
use nhl_corsi::shift_fetch;

const DEFAULT_GAME_ID: u64 = 2023020001;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let game_id = parse_game_id_arg()
        .or_else(|| std::env::var("NHL_GAME_ID").ok()?.trim().parse().ok())
        .unwrap_or(DEFAULT_GAME_ID);

    let shifts = shift_fetch::fetch_shifts(game_id)?;

    let path = PathBuf::from(format!("game_{game_id}_shifts.csv"));
    write_shifts_csv(&path, &shifts)
        .with_context(|| format!("write shift dump for game {game_id}"))?;
    println!("Saved shift data to {}", path.display());

    let players: HashSet<i64> = shifts.iter().map(|s| s.player_id).collect();
    let mut teams: Vec<&str> = Vec::new();
    for shift in &shifts {
        if !teams.contains(&shift.team_abbrev.as_str()) {
            teams.push(&shift.team_abbrev);
        }
    }
    println!("Processed {} shift records for game {game_id}", shifts.len());
    println!("Players: {}", players.len());
    println!("Teams: {}", teams.join(", "));

    Ok(())
}

fn parse_game_id_arg() -> Option<u64> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix("--game=") {
            if let Ok(id) = raw.trim().parse() {
                return Some(id);
            }
        }
        if arg == "--game"
            && let Some(next) = args.get(idx + 1)
            && let Ok(id) = next.trim().parse()
        {
            return Some(id);
        }
    }
    None
}
