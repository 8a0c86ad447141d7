use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

pub mod catalog;
pub mod maps;
pub mod randomizer;
pub mod roster;

pub use catalog::{Catalog, CatalogFile, ReferenceData};
pub use maps::{placeholder_url, resolve_illustration, Illustration, MapPool};
pub use roster::{Agent, Lobby, Player, PlayerId, Team};

/// Players allowed on one team.
pub const TEAM_SIZE: usize = 5;

const ATTACKER_SALT: u64 = 0xA77A_C4E5;
const DEFENDER_SALT: u64 = 0xDEF3_4D35;
const MAP_SALT: u64 = 0x3A9_5EED;

#[derive(Debug, Error)]
pub enum LobbyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog error: {0}")]
    Catalog(String),
    #[error("unknown map '{0}'")]
    UnknownMap(String),
    #[error("cannot give {players} players distinct agents: only {available} non-area-denial agents in the catalog")]
    UnsatisfiableAssignment { players: usize, available: usize },
    #[error("no maps to choose from")]
    NoMaps,
}

pub type Result<T> = std::result::Result<T, LobbyError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LobbySettings {
    pub seed: u64,
    pub attackers: Vec<String>,
    pub defenders: Vec<String>,
    pub randomize_agents: bool,
    pub randomize_map: bool,
    /// Fixed map. When set, the map roll is skipped.
    pub map: Option<String>,
    pub catalog_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
}

/// Serialisable view of a lobby, written as the CLI report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbySnapshot {
    pub seed: Option<u64>,
    pub map: String,
    pub attackers: Vec<Player>,
    pub defenders: Vec<Player>,
}

impl LobbySnapshot {
    pub fn capture(lobby: &Lobby, seed: Option<u64>) -> Self {
        Self {
            seed,
            map: lobby.current_map().to_string(),
            attackers: lobby.players(Team::Attackers).to_vec(),
            defenders: lobby.players(Team::Defenders).to_vec(),
        }
    }
}

/// Plain-text summary: the map, then each team with its open slots.
pub fn lobby_summary(lobby: &Lobby) -> String {
    let mut out = format!("Map: {}\n", lobby.current_map());
    for team in Team::ALL {
        let _ = writeln!(out, "\n{team}");
        for player in lobby.players(team) {
            let _ = writeln!(out, "  {}: {}", player.name, player.agent);
        }
        for _ in 0..lobby.open_slots(team) {
            out.push_str("  Open Slot\n");
        }
    }
    out
}

fn seeded_rng(seed: u64, salt: u64) -> StdRng {
    StdRng::seed_from_u64(seed ^ salt)
}

/// Build a lobby from `settings`, roll whatever was asked for and write the
/// report when an output path is set.
pub fn run(settings: LobbySettings) -> Result<Lobby> {
    let data = match &settings.catalog_path {
        Some(path) => ReferenceData::load(path)?,
        None => ReferenceData::builtin(),
    };

    let mut lobby = Lobby::new(data.maps.clone());
    for (team, names) in [
        (Team::Attackers, &settings.attackers),
        (Team::Defenders, &settings.defenders),
    ] {
        for name in names {
            if lobby.add_player(team, name).is_none() {
                log::warn!("skipped player '{}' for {team}", name.trim());
            }
        }
    }

    if let Some(map) = &settings.map {
        lobby.set_map(map)?;
        if settings.randomize_map {
            log::info!("map fixed to {map}, skipping map roll");
        }
    }

    if settings.randomize_agents {
        let mut rng = seeded_rng(settings.seed, ATTACKER_SALT);
        lobby.randomize_team(Team::Attackers, &data.catalog, &mut rng)?;
        let mut rng = seeded_rng(settings.seed, DEFENDER_SALT);
        lobby.randomize_team(Team::Defenders, &data.catalog, &mut rng)?;
    }

    if settings.randomize_map && settings.map.is_none() {
        let mut rng = seeded_rng(settings.seed, MAP_SALT);
        lobby.randomize_map(&mut rng)?;
    }

    log::info!(
        "lobby ready: seed {}, map {}, {} attackers, {} defenders",
        settings.seed,
        lobby.current_map(),
        lobby.players(Team::Attackers).len(),
        lobby.players(Team::Defenders).len()
    );

    if let Some(path) = &settings.output_path {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let snapshot = LobbySnapshot::capture(&lobby, Some(settings.seed));
        fs::write(path, serde_json::to_string_pretty(&snapshot)?)?;
        log::info!("wrote lobby report to {}", path.display());
    }

    Ok(lobby)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(seed: u64) -> LobbySettings {
        LobbySettings {
            seed,
            attackers: ["Alice", "Bob", "Carol"].iter().map(|s| s.to_string()).collect(),
            defenders: ["Dan", "Erin"].iter().map(|s| s.to_string()).collect(),
            randomize_agents: true,
            randomize_map: true,
            map: None,
            catalog_path: None,
            output_path: None,
        }
    }

    #[test]
    fn same_seed_same_lobby() {
        let a = run(settings(1234)).unwrap();
        let b = run(settings(1234)).unwrap();
        assert_eq!(LobbySnapshot::capture(&a, None), LobbySnapshot::capture(&b, None));
    }

    #[test]
    fn run_skips_blank_and_overflow_names() {
        let mut s = settings(1);
        s.attackers = vec![
            "A".into(),
            " ".into(),
            "B".into(),
            "C".into(),
            "D".into(),
            "E".into(),
            "F".into(),
        ];
        let lobby = run(s).unwrap();
        let names: Vec<&str> = lobby
            .players(Team::Attackers)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, ["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn run_without_rolls_keeps_defaults() {
        let mut s = settings(9);
        s.randomize_agents = false;
        s.randomize_map = false;
        let lobby = run(s).unwrap();
        assert_eq!(lobby.current_map(), "Ascent");
        assert!(lobby
            .players(Team::Attackers)
            .iter()
            .all(|p| p.agent == Agent::Unassigned));
    }

    #[test]
    fn run_rejects_unknown_fixed_map() {
        let mut s = settings(9);
        s.map = Some("Atlantis".to_string());
        assert!(matches!(run(s), Err(LobbyError::UnknownMap(_))));
    }

    #[test]
    fn fixed_map_wins_over_map_roll() {
        for seed in 0..50 {
            let mut s = settings(seed);
            s.map = Some("Haven".to_string());
            assert!(s.randomize_map);
            let lobby = run(s).unwrap();
            assert_eq!(lobby.current_map(), "Haven", "seed {seed}");
        }
    }

    #[test]
    fn run_writes_report() {
        let path = std::env::temp_dir()
            .join(format!("lobby_report_{}", std::process::id()))
            .join("lobby.json");
        let mut s = settings(77);
        s.output_path = Some(path.clone());
        let lobby = run(s).unwrap();

        let written: LobbySnapshot =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }

        assert_eq!(written, LobbySnapshot::capture(&lobby, Some(77)));
    }

    #[test]
    fn summary_lists_players_and_open_slots() {
        let mut lobby = Lobby::default();
        lobby.add_player(Team::Attackers, "Alice");
        let text = lobby_summary(&lobby);
        assert!(text.starts_with("Map: Ascent\n"));
        assert!(text.contains("ATTACKERS\n  Alice: ?\n"));
        assert_eq!(text.matches("Open Slot").count(), 9);
    }
}
