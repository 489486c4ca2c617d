use std::path::PathBuf;

use anyhow::Result;

use nhl_corsi::corsi_export::write_players_csv;
use nhl_corsi::player_directory::PlayerDirectory;
use nhl_corsi::shift_fetch;

const DEFAULT_GAME_ID: u64 = 2023020001;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let game_id = parse_game_id(&args)
        .or_else(|| std::env::var("NHL_GAME_ID").ok()?.trim().parse().ok())
        .unwrap_or(DEFAULT_GAME_ID);
    let also_csv = args.iter().any(|arg| arg == "--csv");

    let shifts = shift_fetch::fetch_shifts(game_id)?;
    let directory = PlayerDirectory::from_shifts(&shifts);
    println!("Found {} unique players in game {game_id}", directory.len());

    let json_path = PathBuf::from("player_dictionary.json");
    directory.save(&json_path)?;
    println!("Saved player dictionary to {}", json_path.display());

    if also_csv {
        let csv_path = PathBuf::from("player_dictionary.csv");
        write_players_csv(&csv_path, &directory)?;
        println!("Saved player dictionary to {}", csv_path.display());
    }

    Ok(())
}

fn parse_game_id(args: &[String]) -> Option<u64> {
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
