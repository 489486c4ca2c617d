use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::shift_index::ShiftRecord;

const DIRECTORY_VERSION: u32 = 1;

pub const UNKNOWN_PLAYER: &str = "Unknown Player";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub team: String,
    pub team_name: String,
}

/// Labeling directory for output only; nothing in the stat computation reads
/// it.
#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    players: HashMap<i64, PlayerInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DirectoryFile {
    version: u32,
    generated_at: String,
    players: HashMap<i64, PlayerInfo>,
}

impl PlayerDirectory {
    /// Build from shift rows; the first row seen for a player wins, matching
    /// the shift feed's one-team-per-player-per-game shape.
    pub fn from_shifts(records: &[ShiftRecord]) -> PlayerDirectory {
        let mut players: HashMap<i64, PlayerInfo> = HashMap::new();
        for record in records {
            players.entry(record.player_id).or_insert_with(|| {
                let first_name = record.first_name.clone().unwrap_or_default();
                let last_name = record.last_name.clone().unwrap_or_default();
                let full_name = match (first_name.is_empty(), last_name.is_empty()) {
                    (true, true) => UNKNOWN_PLAYER.to_string(),
                    (true, false) => last_name.clone(),
                    (false, true) => first_name.clone(),
                    (false, false) => format!("{first_name} {last_name}"),
                };
                PlayerInfo {
                    full_name,
                    first_name,
                    last_name,
                    team: record.team_abbrev.clone(),
                    team_name: record.team_name.clone().unwrap_or_default(),
                }
            });
        }
        PlayerDirectory { players }
    }

    pub fn player_name(&self, player_id: i64) -> &str {
        self.players
            .get(&player_id)
            .map(|info| info.full_name.as_str())
            .unwrap_or(UNKNOWN_PLAYER)
    }

    pub fn team(&self, player_id: i64) -> Option<&str> {
        self.players.get(&player_id).map(|info| info.team.as_str())
    }

    pub fn get(&self, player_id: i64) -> Option<&PlayerInfo> {
        self.players.get(&player_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &PlayerInfo)> {
        self.players.iter().map(|(id, info)| (*id, info))
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)
                .with_context(|| format!("create directory {}", dir.display()))?;
        }
        let file = DirectoryFile {
            version: DIRECTORY_VERSION,
            generated_at: chrono::Utc::now().to_rfc3339(),
            players: self.players.clone(),
        };
        let json = serde_json::to_string_pretty(&file).context("serialize player directory")?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<PlayerDirectory> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read player directory {}", path.display()))?;
        let file: DirectoryFile = serde_json::from_str(&raw)
            .with_context(|| format!("parse player directory {}", path.display()))?;
        if file.version != DIRECTORY_VERSION {
            return Err(anyhow!(
                "player directory {} has version {}, expected {DIRECTORY_VERSION}",
                path.display(),
                file.version
            ));
        }
        Ok(PlayerDirectory {
            players: file.players,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(player_id: i64, first: &str, last: &str, team: &str) -> ShiftRecord {
        ShiftRecord {
            player_id,
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
            team_abbrev: team.to_string(),
            team_name: Some(format!("{team} Full Name")),
            period: 1,
            start_time: Some("00:00".to_string()),
            end_time: Some("01:00".to_string()),
            type_code: 517,
        }
    }

    #[test]
    fn first_row_wins_per_player() {
        let records = vec![
            shift(10, "Patrice", "Bergeron", "BOS"),
            shift(10, "Wrong", "Name", "CHI"),
            shift(11, "Connor", "Bedard", "CHI"),
        ];
        let directory = PlayerDirectory::from_shifts(&records);
        assert_eq!(directory.len(), 2);
        assert_eq!(directory.player_name(10), "Patrice Bergeron");
        assert_eq!(directory.team(10), Some("BOS"));
        assert_eq!(directory.player_name(11), "Connor Bedard");
    }

    #[test]
    fn unknown_ids_get_placeholder() {
        let directory = PlayerDirectory::from_shifts(&[]);
        assert_eq!(directory.player_name(8474151), UNKNOWN_PLAYER);
        assert_eq!(directory.team(8474151), None);
    }
}
