use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::maps::MapPool;
use crate::{LobbyError, Result, TEAM_SIZE};

/// Every selectable agent, in display order.
pub const DEFAULT_AGENTS: &[&str] = &[
    "Astra",
    "Breach",
    "Brimstone",
    "Chamber",
    "Clove",
    "Cypher",
    "Deadlock",
    "Fade",
    "Gekko",
    "Harbor",
    "Iso",
    "Jett",
    "KAY/O",
    "Killjoy",
    "Neon",
    "Omen",
    "Phoenix",
    "Raze",
    "Reyna",
    "Sage",
    "Skye",
    "Sova",
    "Tejo",
    "Viper",
    "Vyse",
    "Waylay",
    "Yoru",
];

/// Agents whose kit is built around smokes. Each team gets exactly one.
pub const DEFAULT_AREA_DENIAL: &[&str] = &[
    "Astra",
    "Brimstone",
    "Clove",
    "Harbor",
    "Omen",
    "Viper",
];

/// Validated agent catalog: the full roster of agents plus the area-denial
/// subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    agents: Vec<String>,
    area_denial: Vec<String>,
}

impl Catalog {
    pub fn new(agents: Vec<String>, area_denial: Vec<String>) -> Result<Self> {
        let mut seen = HashSet::new();
        for agent in &agents {
            if agent.trim().is_empty() {
                return Err(LobbyError::Catalog("agent names must not be blank".to_string()));
            }
            if !seen.insert(agent.as_str()) {
                return Err(LobbyError::Catalog(format!("duplicate agent '{agent}'")));
            }
        }

        if area_denial.is_empty() {
            return Err(LobbyError::Catalog(
                "at least one area-denial agent is required".to_string(),
            ));
        }

        let mut seen_area = HashSet::new();
        for agent in &area_denial {
            if !seen.contains(agent.as_str()) {
                return Err(LobbyError::Catalog(format!(
                    "area-denial agent '{agent}' is not in the agent list"
                )));
            }
            if !seen_area.insert(agent.as_str()) {
                return Err(LobbyError::Catalog(format!(
                    "duplicate area-denial agent '{agent}'"
                )));
            }
        }

        if area_denial.len() >= agents.len() {
            return Err(LobbyError::Catalog(
                "area-denial agents must be a strict subset of the agent list".to_string(),
            ));
        }

        if agents.len() < TEAM_SIZE {
            return Err(LobbyError::Catalog(format!(
                "catalog has {} agents, a full team needs {}",
                agents.len(),
                TEAM_SIZE
            )));
        }

        let catalog = Self { agents, area_denial };
        let others = catalog.non_area_denial().count();
        if others < TEAM_SIZE - 1 {
            return Err(LobbyError::Catalog(format!(
                "catalog has {} non-area-denial agents, a full team needs {}",
                others,
                TEAM_SIZE - 1
            )));
        }

        Ok(catalog)
    }

    pub fn builtin() -> Self {
        Self {
            agents: DEFAULT_AGENTS.iter().map(|s| s.to_string()).collect(),
            area_denial: DEFAULT_AREA_DENIAL.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn agents(&self) -> &[String] {
        &self.agents
    }

    pub fn area_denial(&self) -> &[String] {
        &self.area_denial
    }

    pub fn is_area_denial(&self, agent: &str) -> bool {
        self.area_denial.iter().any(|a| a == agent)
    }

    /// Agents outside the area-denial subset, in catalog order.
    pub fn non_area_denial(&self) -> impl Iterator<Item = &String> + '_ {
        self.agents.iter().filter(move |a| !self.is_area_denial(a))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// On-disk layout of a catalog file. `maps` is optional and falls back to
/// the built-in map pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub agents: Vec<String>,
    pub area_denial: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maps: Option<Vec<String>>,
}

/// Everything the randomiser reads but never mutates.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub catalog: Catalog,
    pub maps: MapPool,
}

impl ReferenceData {
    pub fn builtin() -> Self {
        Self {
            catalog: Catalog::builtin(),
            maps: MapPool::builtin(),
        }
    }

    pub fn from_file(file: CatalogFile) -> Result<Self> {
        let catalog = Catalog::new(file.agents, file.area_denial)?;
        let maps = match file.maps {
            Some(names) => MapPool::new(names)?,
            None => MapPool::builtin(),
        };
        Ok(Self { catalog, maps })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let file: CatalogFile = serde_json::from_str(&data)?;
        let data = Self::from_file(file)?;
        log::info!(
            "loaded catalog from {}: {} agents ({} area-denial), {} maps",
            path.display(),
            data.catalog.agents().len(),
            data.catalog.area_denial().len(),
            data.maps.names().len()
        );
        Ok(data)
    }

    pub fn to_file(&self) -> CatalogFile {
        CatalogFile {
            agents: self.catalog.agents().to_vec(),
            area_denial: self.catalog.area_denial().to_vec(),
            maps: Some(self.maps.names().to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn builtin_catalog_passes_validation() {
        let builtin = Catalog::builtin();
        let checked = Catalog::new(builtin.agents().to_vec(), builtin.area_denial().to_vec()).unwrap();
        assert_eq!(checked, builtin);
    }

    #[test]
    fn non_area_denial_excludes_smokes() {
        let catalog = Catalog::builtin();
        assert!(catalog.non_area_denial().all(|a| !catalog.is_area_denial(a)));
        assert_eq!(
            catalog.non_area_denial().count() + catalog.area_denial().len(),
            catalog.agents().len()
        );
    }

    #[test]
    fn rejects_area_denial_outside_catalog() {
        let err = Catalog::new(names(&["A", "B", "C", "D", "E", "F"]), names(&["Z"])).unwrap_err();
        assert!(matches!(err, LobbyError::Catalog(_)));
    }

    #[test]
    fn rejects_area_denial_covering_whole_catalog() {
        let all = names(&["A", "B", "C", "D", "E"]);
        assert!(Catalog::new(all.clone(), all).is_err());
    }

    #[test]
    fn rejects_catalog_too_small_for_team() {
        assert!(Catalog::new(names(&["A", "B", "C", "D"]), names(&["A"])).is_err());
        // five agents but only three outside the area-denial subset
        assert!(Catalog::new(names(&["A", "B", "C", "D", "E"]), names(&["A", "B"])).is_err());
        assert!(Catalog::new(names(&["A", "B", "C", "D", "E"]), names(&["A"])).is_ok());
    }

    #[test]
    fn rejects_duplicates() {
        assert!(Catalog::new(names(&["A", "A", "C", "D", "E", "F"]), names(&["C"])).is_err());
        assert!(Catalog::new(names(&["A", "B", "C", "D", "E", "F"]), names(&["A", "A"])).is_err());
    }

    #[test]
    fn loads_catalog_file_with_default_maps() {
        let path = std::env::temp_dir().join(format!("lobby_catalog_{}.json", std::process::id()));
        let file = CatalogFile {
            agents: names(&["A", "B", "C", "D", "E", "F"]),
            area_denial: names(&["F"]),
            maps: None,
        };
        fs::write(&path, serde_json::to_string(&file).unwrap()).unwrap();

        let data = ReferenceData::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(data.catalog.agents().len(), 6);
        assert!(data.catalog.is_area_denial("F"));
        assert_eq!(data.maps, MapPool::builtin());
    }

    #[test]
    fn load_reports_malformed_json() {
        let path = std::env::temp_dir().join(format!("lobby_bad_{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let err = ReferenceData::load(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, LobbyError::Json(_)));
    }
}
