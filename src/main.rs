use std::path::PathBuf;

use anyhow::{Context, Result};

use nhl_corsi::corsi::{CorsiAccumulator, CorsiReport, PlayerCorsiStat, team_totals};
use nhl_corsi::corsi_export::{write_corsi_csv, write_enriched_csv};
use nhl_corsi::enrich::enrich_events;
use nhl_corsi::pbp_fetch;
use nhl_corsi::player_directory::PlayerDirectory;
use nhl_corsi::shift_fetch;
use nhl_corsi::shift_index::{ShiftIndex, TeamAssignment};

const DEFAULT_GAME_ID: u64 = 2023020001;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let game_id = parse_game_id_arg()
        .or_else(game_id_from_env)
        .unwrap_or(DEFAULT_GAME_ID);
    let out_dir = parse_out_dir_arg().unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("create output dir {}", out_dir.display()))?;

    println!("Fetching shift data for game {game_id}...");
    let shifts = shift_fetch::fetch_shifts(game_id)?;
    println!("  {} shift records", shifts.len());

    println!("Fetching play-by-play for game {game_id}...");
    let game = pbp_fetch::fetch_play_by_play(game_id)?;
    println!("  {} events", game.events.len());

    let teams = match game.teams {
        Some(teams) => teams,
        None => {
            println!("No home/away metadata in play-by-play; falling back to shift order");
            TeamAssignment::from_shift_order(&shifts)
                .context("unable to determine home/away teams")?
        }
    };
    println!("Home: {}  Away: {}", teams.home, teams.away);

    let directory = PlayerDirectory::from_shifts(&shifts);
    let index = ShiftIndex::build(&shifts);
    if index.is_empty() {
        println!("Warning: no usable shift intervals; on-ice sets will be empty");
    }

    let enriched = enrich_events(&game.events, &index, &teams);
    let report = CorsiAccumulator::accumulate(&enriched).finalize(&teams);

    print_summary(&report, &directory);

    let enriched_path = out_dir.join(format!("game_{game_id}_with_players.csv"));
    write_enriched_csv(&enriched_path, &enriched)?;
    println!("Saved enriched events to {}", enriched_path.display());

    let corsi_path = out_dir.join("player_corsi_5v5.csv");
    write_corsi_csv(&corsi_path, &report, &directory)?;
    println!("Saved corsi table to {}", corsi_path.display());

    let directory_path = out_dir.join("player_dictionary.json");
    directory.save(&directory_path)?;
    println!("Saved player directory to {}", directory_path.display());

    Ok(())
}

fn print_summary(report: &CorsiReport, directory: &PlayerDirectory) {
    println!();
    println!("{}", "=".repeat(72));
    println!("5v5 CORSI SUMMARY");
    println!("{}", "=".repeat(72));
    println!(
        "Qualifying shot attempts: {} ({} skipped, shooter unattributable)",
        report.qualifying_events,
        report.skipped.len()
    );
    println!("Players analyzed: {}", report.players.len());

    println!();
    println!("Top 10 by Corsi%:");
    for stat in report.players.iter().take(10) {
        print_player_line(stat, directory);
    }

    if report.players.len() > 10 {
        println!();
        println!("Bottom 5 by Corsi%:");
        let skip = report.players.len().saturating_sub(5);
        for stat in report.players.iter().skip(skip) {
            print_player_line(stat, directory);
        }
    }

    println!();
    println!("Team totals:");
    for totals in team_totals(&report.players) {
        println!(
            "  {}: {:.1}% Corsi (CF: {}, CA: {})",
            totals.team, totals.corsi_pct, totals.cf, totals.ca
        );
    }
}

fn print_player_line(stat: &PlayerCorsiStat, directory: &PlayerDirectory) {
    println!(
        "  {:<22} ({}) | CF: {:>2} | CA: {:>2} | Corsi%: {:>5.1} | Rel: {:>+5.1}",
        directory.player_name(stat.player_id),
        stat.team,
        stat.cf,
        stat.ca,
        stat.corsi_pct,
        stat.corsi_rel
    );
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

fn parse_out_dir_arg() -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix("--out-dir=") {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == "--out-dir"
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(PathBuf::from(next.trim()));
        }
    }
    None
}

fn game_id_from_env() -> Option<u64> {
    std::env::var("NHL_GAME_ID").ok()?.trim().parse().ok()
}
