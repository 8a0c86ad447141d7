use std::path::{Path, PathBuf};

use crate::{LobbyError, Result};

pub const DEFAULT_MAPS: &[&str] = &[
    "Abyss", "Ascent", "Bind", "Breeze", "Corrode", "Fracture", "Haven", "Icebox", "Lotus",
    "Pearl", "Split", "Sunset",
];

/// Map shown before the first map roll.
pub const DEFAULT_MAP: &str = "Ascent";

const PLACEHOLDER_BASE: &str = "https://placehold.co/300x150/2d3748/fff?text=";

/// Ordered set of maps a lobby may play on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapPool {
    names: Vec<String>,
}

impl MapPool {
    pub fn new(names: Vec<String>) -> Result<Self> {
        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(LobbyError::Catalog("map names must not be blank".to_string()));
            }
            if names[..i].contains(name) {
                return Err(LobbyError::Catalog(format!("duplicate map '{name}'")));
            }
        }
        if names.is_empty() {
            return Err(LobbyError::NoMaps);
        }
        Ok(Self { names })
    }

    pub fn builtin() -> Self {
        Self {
            names: DEFAULT_MAPS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// The map a fresh lobby starts on: `Ascent` when the pool has it,
    /// otherwise the first entry.
    pub fn default_map(&self) -> &str {
        if self.contains(DEFAULT_MAP) {
            DEFAULT_MAP
        } else {
            &self.names[0]
        }
    }
}

impl Default for MapPool {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Loading-screen file name for a built-in map.
pub fn illustration_file(map: &str) -> Option<String> {
    if DEFAULT_MAPS.contains(&map) {
        Some(format!("Loading_Screen_{map}.webp"))
    } else {
        None
    }
}

/// Where a map's illustration comes from once the lookup has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Illustration {
    File(PathBuf),
    Placeholder(String),
}

impl Illustration {
    pub fn placeholder(map: &str) -> Self {
        Illustration::Placeholder(placeholder_url(map))
    }
}

/// Generated stand-in image labelled with the map name.
pub fn placeholder_url(map: &str) -> String {
    format!("{PLACEHOLDER_BASE}{map}")
}

/// Resolve a map's illustration under `assets_dir`, falling back to a
/// generated placeholder labelled with the map name.
pub fn resolve_illustration(assets_dir: Option<&Path>, map: &str) -> Illustration {
    let found = assets_dir
        .zip(illustration_file(map))
        .map(|(dir, file)| dir.join(file))
        .filter(|path| path.is_file());

    match found {
        Some(path) => Illustration::File(path),
        None => {
            log::error!("Failed to load image for map: {map}");
            Illustration::placeholder(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn builtin_pool_has_twelve_maps_and_ascent_default() {
        let pool = MapPool::builtin();
        assert_eq!(pool.names().len(), 12);
        assert_eq!(pool.default_map(), "Ascent");
    }

    #[test]
    fn custom_pool_without_ascent_defaults_to_first() {
        let pool = MapPool::new(vec!["Bind".to_string(), "Split".to_string()]).unwrap();
        assert_eq!(pool.default_map(), "Bind");
    }

    #[test]
    fn empty_pool_is_rejected() {
        assert!(matches!(MapPool::new(Vec::new()), Err(LobbyError::NoMaps)));
    }

    #[test]
    fn duplicate_map_is_rejected() {
        let names = vec!["Bind".to_string(), "Bind".to_string()];
        assert!(matches!(MapPool::new(names), Err(LobbyError::Catalog(_))));
    }

    #[test]
    fn every_builtin_map_has_an_illustration_name() {
        for map in DEFAULT_MAPS {
            assert_eq!(
                illustration_file(map).unwrap(),
                format!("Loading_Screen_{map}.webp")
            );
        }
        assert!(illustration_file("Nowhere").is_none());
    }

    #[test]
    fn missing_asset_falls_back_to_placeholder() {
        assert_eq!(
            resolve_illustration(None, "Lotus"),
            Illustration::Placeholder(
                "https://placehold.co/300x150/2d3748/fff?text=Lotus".to_string()
            )
        );

        let empty_dir = std::env::temp_dir().join(format!("lobby_assets_empty_{}", std::process::id()));
        fs::create_dir_all(&empty_dir).unwrap();
        assert!(matches!(
            resolve_illustration(Some(empty_dir.as_path()), "Lotus"),
            Illustration::Placeholder(_)
        ));
        let _ = fs::remove_dir_all(&empty_dir);
    }

    #[test]
    fn present_asset_resolves_to_file() {
        let dir = std::env::temp_dir().join(format!("lobby_assets_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("Loading_Screen_Pearl.webp");
        fs::write(&path, b"stub").unwrap();

        let resolved = resolve_illustration(Some(dir.as_path()), "Pearl");
        let _ = fs::remove_dir_all(&dir);

        assert_eq!(resolved, Illustration::File(path));
    }
}
