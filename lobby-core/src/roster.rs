use serde::{Deserialize, Serialize};
use std::fmt;

use rand::Rng;

use crate::catalog::Catalog;
use crate::maps::MapPool;
use crate::randomizer::{randomize_map, randomize_team_agents};
use crate::{LobbyError, Result, TEAM_SIZE};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Team {
    Attackers,
    Defenders,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Attackers, Team::Defenders];

    pub fn label(self) -> &'static str {
        match self {
            Team::Attackers => "ATTACKERS",
            Team::Defenders => "DEFENDERS",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Agent held by a player. New players start unassigned.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Agent {
    #[default]
    Unassigned,
    Named(String),
}

impl Agent {
    pub fn name(&self) -> Option<&str> {
        match self {
            Agent::Unassigned => None,
            Agent::Named(name) => Some(name),
        }
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Agent::Unassigned => f.write_str("?"),
            Agent::Named(name) => f.write_str(name),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub agent: Agent,
}

/// Both team rosters plus the selected map.
///
/// Every mutation happens through `&mut self`; callers read the rosters back
/// afterwards. Invalid input (blank names, full teams, unknown ids) is
/// ignored without touching state.
#[derive(Clone, Debug)]
pub struct Lobby {
    attackers: Vec<Player>,
    defenders: Vec<Player>,
    current_map: String,
    maps: MapPool,
    next_id: u64,
}

impl Lobby {
    pub fn new(maps: MapPool) -> Self {
        let current_map = maps.default_map().to_string();
        Self {
            attackers: Vec::new(),
            defenders: Vec::new(),
            current_map,
            maps,
            next_id: 1,
        }
    }

    pub fn players(&self, team: Team) -> &[Player] {
        match team {
            Team::Attackers => &self.attackers,
            Team::Defenders => &self.defenders,
        }
    }

    fn players_mut(&mut self, team: Team) -> &mut Vec<Player> {
        match team {
            Team::Attackers => &mut self.attackers,
            Team::Defenders => &mut self.defenders,
        }
    }

    pub fn open_slots(&self, team: Team) -> usize {
        TEAM_SIZE.saturating_sub(self.players(team).len())
    }

    pub fn current_map(&self) -> &str {
        &self.current_map
    }

    pub fn maps(&self) -> &MapPool {
        &self.maps
    }

    /// Append a player with the trimmed `name`. Returns `None`, leaving the
    /// lobby untouched, when the name is blank or the team is full.
    pub fn add_player(&mut self, team: Team, name: &str) -> Option<PlayerId> {
        let name = name.trim();
        if name.is_empty() {
            log::debug!("ignoring blank player name for {team}");
            return None;
        }
        if self.open_slots(team) == 0 {
            log::debug!("{team} is full, ignoring '{name}'");
            return None;
        }

        let id = PlayerId(self.next_id);
        self.next_id += 1;
        self.players_mut(team).push(Player {
            id,
            name: name.to_string(),
            agent: Agent::Unassigned,
        });
        Some(id)
    }

    /// Rename the player `id` on `team`. A blank `new_name` keeps the
    /// previous name. Returns whether the name changed hands.
    pub fn rename_player(&mut self, team: Team, id: PlayerId, new_name: &str) -> bool {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return false;
        }
        match self.players_mut(team).iter_mut().find(|p| p.id == id) {
            Some(player) => {
                player.name = new_name.to_string();
                true
            }
            None => {
                log::debug!("no player {id} on {team}, rename ignored");
                false
            }
        }
    }

    pub fn set_map(&mut self, map: &str) -> Result<()> {
        if !self.maps.contains(map) {
            return Err(LobbyError::UnknownMap(map.to_string()));
        }
        self.current_map = map.to_string();
        Ok(())
    }

    /// Swap the map pool, e.g. after loading another catalog. The current
    /// map survives when the new pool still has it.
    pub fn set_map_pool(&mut self, maps: MapPool) {
        if !maps.contains(&self.current_map) {
            self.current_map = maps.default_map().to_string();
        }
        self.maps = maps;
    }

    /// Re-roll agents for both teams. Each team draws from the whole catalog
    /// on its own, so the same agent may appear once on each side.
    pub fn randomize_agents<R: Rng + ?Sized>(&mut self, catalog: &Catalog, rng: &mut R) -> Result<()> {
        for team in Team::ALL {
            self.randomize_team(team, catalog, rng)?;
        }
        Ok(())
    }

    pub fn randomize_team<R: Rng + ?Sized>(
        &mut self,
        team: Team,
        catalog: &Catalog,
        rng: &mut R,
    ) -> Result<()> {
        let players = randomize_team_agents(self.players(team), catalog, rng)?;
        self.replace_players(team, players);
        Ok(())
    }

    /// Roll a new map from the lobby's pool and return it.
    pub fn randomize_map<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&str> {
        let map = randomize_map(self.maps.names(), rng)?.to_string();
        log::debug!("map rolled: {map}");
        self.current_map = map;
        Ok(&self.current_map)
    }

    /// Swap in a freshly randomised roster. Only agents may differ from the
    /// current roster; ids, names and order must match.
    pub(crate) fn replace_players(&mut self, team: Team, players: Vec<Player>) {
        debug_assert!(self
            .players(team)
            .iter()
            .map(|p| p.id)
            .eq(players.iter().map(|p| p.id)));
        *self.players_mut(team) = players;
    }
}

impl Default for Lobby {
    fn default() -> Self {
        Self::new(MapPool::builtin())
    }
}
