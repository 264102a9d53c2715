//! Key-value settings persisted as a small JSON file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use crate::error::{PiketError, Result};

/// Used whenever no roster has been stored yet, or the stored one is blank
pub const DEFAULT_ROSTER: [&str; 7] = [
    "Mas Brian",
    "Mas Pras",
    "Mas Jojo",
    "Mas Azka",
    "Mas Dito",
    "Mas Nizar",
    "Mas Fendi",
];

const ROSTER_KEY: &str = "roster";
const BOT_TOKEN_KEY: &str = "bot_token";
const TARGET_CHAT_ID_KEY: &str = "target_chat_id";
const ROSTER_DELIMITER: &str = "|";

pub struct SettingsStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl SettingsStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values: BTreeMap<String, String> = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), keys = values.len(), "opened settings");
        Ok(Self { path: Some(path), values })
    }

    /// Store that never touches disk
    pub fn in_memory() -> Self {
        Self { path: None, values: BTreeMap::new() }
    }

    /// `$XDG_CONFIG_HOME/piketers/settings.json`, else `~/.config/piketers/settings.json`
    pub fn default_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("piketers").join("settings.json")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home).join(".config").join("piketers").join("settings.json")
        } else {
            PathBuf::from("/tmp/piketers/settings.json")
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn roster(&self) -> Vec<String> {
        let stored = self.get(ROSTER_KEY).map(split_roster).unwrap_or_default();
        if stored.is_empty() {
            DEFAULT_ROSTER.iter().map(|s| s.to_string()).collect()
        } else {
            stored
        }
    }

    /// Stores `roster`, dropping blank names. A name containing the roster
    /// delimiter is rejected and the stored roster is left unchanged.
    pub fn set_roster(&mut self, roster: &[String]) -> Result<()> {
        let mut kept = Vec::with_capacity(roster.len());
        for name in roster {
            if let Some(name) = member_name(name)? {
                kept.push(name);
            }
        }
        self.set(ROSTER_KEY, kept.join(ROSTER_DELIMITER))
    }

    /// Appends a member and returns the updated roster
    pub fn add_member(&mut self, name: &str) -> Result<Vec<String>> {
        let Some(name) = member_name(name)? else {
            return Err(PiketError::InvalidInput("member name is blank".to_string()));
        };
        let mut roster = self.roster();
        roster.push(name.to_string());
        self.set_roster(&roster)?;
        info!(member = name, "added roster member");
        Ok(roster)
    }

    /// Removes the member at `index` (0-based) and returns their name
    pub fn remove_member(&mut self, index: usize) -> Result<String> {
        let mut roster = self.roster();
        if index >= roster.len() {
            return Err(PiketError::InvalidInput(format!("no member at position {}", index)));
        }
        let removed = roster.remove(index);
        self.set_roster(&roster)?;
        info!(member = %removed, "removed roster member");
        Ok(removed)
    }

    pub fn bot_token(&self) -> String {
        self.get(BOT_TOKEN_KEY).unwrap_or_default().to_string()
    }

    pub fn set_bot_token(&mut self, token: &str) -> Result<()> {
        self.set(BOT_TOKEN_KEY, token.trim().to_string())
    }

    pub fn target_chat_id(&self) -> String {
        self.get(TARGET_CHAT_ID_KEY).unwrap_or_default().to_string()
    }

    pub fn set_target_chat_id(&mut self, chat_id: &str) -> Result<()> {
        self.set(TARGET_CHAT_ID_KEY, chat_id.trim().to_string())
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.save()
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(path, content)?;
        debug!(path = %path.display(), "saved settings");
        Ok(())
    }
}

/// Trimmed member name, `None` when blank
fn member_name(name: &str) -> Result<Option<&str>> {
    let name = name.trim();
    if name.contains(ROSTER_DELIMITER) {
        return Err(PiketError::InvalidInput(format!("member name cannot contain '{}'", ROSTER_DELIMITER)));
    }
    Ok((!name.is_empty()).then_some(name))
}

fn split_roster(stored: &str) -> Vec<String> {
    stored
        .split(ROSTER_DELIMITER)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
