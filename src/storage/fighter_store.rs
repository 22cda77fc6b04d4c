use crate::config::{default_data_dir, GladiatorConfig};
use crate::error::{GladiatorError, Result};
use crate::fighter::Fighter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One pretty-printed `<fighter_id>.json` file per fighter.
#[derive(Debug, Clone)]
pub struct FighterStore {
    dir: PathBuf,
}

impl FighterStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn from_config(config: &GladiatorConfig) -> Result<Self> {
        Self::new(&config.data_dir)
    }

    /// Store under `~/.gladiators/fighters`.
    pub fn open_default() -> Result<Self> {
        Self::new(default_data_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ids must be UUIDs, which keeps them from escaping the data directory.
    fn path_for(&self, fighter_id: &str) -> Option<PathBuf> {
        Uuid::parse_str(fighter_id)
            .ok()
            .map(|_| self.dir.join(format!("{}.json", fighter_id)))
    }

    pub fn save_fighter(&self, fighter: &Fighter) -> Result<()> {
        let path = self.path_for(&fighter.fighter_id).ok_or_else(|| {
            GladiatorError::InvalidFighter(format!("malformed id '{}'", fighter.fighter_id))
        })?;
        let json = serde_json::to_string_pretty(fighter)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_fighter(&self, fighter_id: &str) -> Result<Fighter> {
        let not_found = || GladiatorError::FighterNotFound(fighter_id.to_string());
        let path = self.path_for(fighter_id).ok_or_else(not_found)?;
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&json)?)
    }

    /// All readable fighters, newest first. Corrupt files are skipped.
    pub fn list_fighters(&self) -> Result<Vec<Fighter>> {
        let mut fighters = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();

            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let loaded = fs::read_to_string(&path)
                .map_err(GladiatorError::from)
                .and_then(|json| {
                    serde_json::from_str::<Fighter>(&json).map_err(GladiatorError::from)
                });
            match loaded {
                Ok(fighter) => fighters.push(fighter),
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "skipping unreadable fighter file"
                ),
            }
        }

        fighters.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(fighters)
    }

    pub fn delete_fighter(&self, fighter_id: &str) -> Result<()> {
        let not_found = || GladiatorError::FighterNotFound(fighter_id.to_string());
        let path = self.path_for(fighter_id).ok_or_else(not_found)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(not_found()),
            Err(e) => Err(e.into()),
        }
    }

    /// Case-insensitive substring match on names.
    pub fn search_fighters(&self, query: &str) -> Result<Vec<Fighter>> {
        let query = query.to_lowercase();
        Ok(self
            .list_fighters()?
            .into_iter()
            .filter(|f| f.name.to_lowercase().contains(&query))
            .collect())
    }
}
