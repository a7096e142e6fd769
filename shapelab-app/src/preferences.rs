//! Persistent lab preferences (sampler defaults and default inputs).
//! Stored as JSON in the OS config directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use shapelab_engine::SamplerConfig;

const FILE_NAME: &str = "preferences.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabPreferences {
    #[serde(default)]
    pub sampler: SamplerConfig,
    /// Relation used when `complex` gets no `--relation`.
    #[serde(default = "default_relation")]
    pub default_relation: String,
    /// Function used when `complex` gets no `--function`.
    #[serde(default = "default_function")]
    pub default_function: String,
    #[serde(default)]
    pub pretty_json: bool,
}

fn default_relation() -> String {
    "x**2 + y**2 == 1".to_string()
}
fn default_function() -> String {
    "(z - 1j)**2".to_string()
}

impl Default for LabPreferences {
    fn default() -> Self {
        Self {
            sampler: SamplerConfig::default(),
            default_relation: default_relation(),
            default_function: default_function(),
            pretty_json: false,
        }
    }
}

impl LabPreferences {
    /// Load preferences from `path`, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(json) => match serde_json::from_str::<LabPreferences>(&json) {
                    Ok(mut prefs) => {
                        info!("Loaded preferences from {}", path.display());
                        if let Err(e) = prefs.sampler.validate() {
                            error!("Ignoring sampler preferences: {e}");
                            prefs.sampler = SamplerConfig::default();
                        }
                        return prefs;
                    }
                    Err(e) => {
                        error!("Failed to parse preferences: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read preferences file: {e}");
                }
            }
        } else {
            debug!("No preferences file at {}", path.display());
        }
        Self::default()
    }

    /// Persist preferences to `path`, creating its directory.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating config directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        debug!("Saved preferences to {}", path.display());
        Ok(())
    }
}

/// `explicit` if given, otherwise `preferences.json` in the per-user config
/// directory (or the current directory when there is none).
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    directories::ProjectDirs::from("", "", "ShapeLab")
        .map(|d| d.config_dir().join(FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(FILE_NAME))
}
