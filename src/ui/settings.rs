use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::paths;
use crate::error::{PlacerError, PlacerResult};
use crate::host::PreferenceStore;

/// Boolean preferences that persist to disk between sessions
#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PlacerPreferences {
    #[serde(default)]
    flags: BTreeMap<String, bool>,
    /// Where the preferences are saved; `None` keeps them in memory only
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl PlacerPreferences {
    /// Get the preferences file path
    pub fn file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push(paths::CONFIG_DIR);
            p.push(paths::PREFERENCES_FILE);
            p
        })
    }

    /// Preferences that are never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from the config directory, or defaults if missing or unreadable
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            warn!("{}; preferences will not be saved", PlacerError::NoConfigDir);
            return Self::in_memory();
        };
        match Self::load_from(&path) {
            Ok(preferences) => preferences,
            Err(PlacerError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Self {
                    path: Some(path),
                    ..Default::default()
                }
            }
            Err(e) => {
                warn!("{e}; using default preferences");
                Self {
                    path: Some(path),
                    ..Default::default()
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> PlacerResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| PlacerError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut preferences: Self = ron::from_str(&content).map_err(|source| PlacerError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        preferences.path = Some(path.to_path_buf());
        Ok(preferences)
    }

    /// Write to the file the preferences were loaded from. In-memory preferences are a no-op.
    pub fn save(&self) -> PlacerResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| PlacerError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, content).map_err(|source| PlacerError::Write {
            path: path.clone(),
            source,
        })?;
        info!("Preferences saved to: {:?}", path);
        Ok(())
    }
}

impl PreferenceStore for PlacerPreferences {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.flags.get(key).copied().unwrap_or(default)
    }

    /// Stores and saves immediately; write failures are logged.
    fn set_bool(&mut self, key: &str, value: bool) {
        if self.flags.insert(key.to_string(), value) == Some(value) {
            return;
        }
        if let Err(e) = self.save() {
            error!("Failed to save preferences: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("bevy_prefab_placer_prefs_{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn unset_key_uses_default() {
        let preferences = PlacerPreferences::in_memory();
        assert!(preferences.get_bool("missing", true));
        assert!(!preferences.get_bool("missing", false));
    }

    #[test]
    fn set_bool_persists() {
        let path = temp_file("roundtrip.ron");
        let mut preferences = PlacerPreferences {
            path: Some(path.clone()),
            ..Default::default()
        };
        preferences.set_bool("light", true);

        let loaded = PlacerPreferences::load_from(&path).unwrap();
        assert!(loaded.get_bool("light", false));
        assert_eq!(loaded, preferences);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let path = temp_file("broken.ron");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "(flags: {\"a\": maybe})").unwrap();
        assert!(matches!(
            PlacerPreferences::load_from(&path),
            Err(PlacerError::Parse { .. })
        ));
        let _ = fs::remove_file(path);
    }
}
