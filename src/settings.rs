//! Session settings and persistence
//!
//! Settings live in `settings.json` in the user's configuration directory.
//! Load failures fall back to defaults; save failures are logged and never
//! interrupt the session.

use std::fs;
use std::path::PathBuf;

use crescendo_core::{default_playlist, TrackInfo};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::SessionResult;

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";

/// User-tunable session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Master volume (0.0 to 1.0), applied by the audio sink
    pub master_volume: f32,

    /// Lower bound of the intensity-driven volume ramp
    pub min_volume: f32,

    /// Upper bound of the intensity-driven volume ramp
    pub max_volume: f32,

    /// Playlist, one track per intensity band
    pub playlist: Vec<TrackInfo>,

    /// Which evaluation backend to use, if any
    pub evaluator: EvaluatorChoice,
}

/// Evaluation backend selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvaluatorChoice {
    /// No evaluation-driven updates
    Disabled,
    /// Cloud evaluation lookup keyed by FEN
    Cloud { base_url: String },
    /// Local UCI engine process
    Engine { path: PathBuf, movetime_ms: u64 },
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.7,
            min_volume: 0.25,
            max_volume: 1.0,
            playlist: default_playlist(),
            evaluator: EvaluatorChoice::Disabled,
        }
    }
}

/// Resolve the settings file path
///
/// Falls back to a local `settings.json` if the system config dir cannot
/// be found.
fn settings_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "crescendo", "Crescendo") {
        proj_dirs.config_dir().join(SETTINGS_FILENAME)
    } else {
        PathBuf::from(SETTINGS_FILENAME)
    }
}

/// Load settings, falling back to defaults on any failure
pub fn load_settings() -> SessionSettings {
    let path = settings_path();
    if !path.exists() {
        info!("[SETTINGS] no settings file at {:?}, using defaults", path);
        return SessionSettings::default();
    }

    match fs::read_to_string(&path) {
        Ok(contents) => match serde_json::from_str::<SessionSettings>(&contents) {
            Ok(settings) => {
                info!("[SETTINGS] loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!(
                    "[SETTINGS] failed to parse {:?}: {}. Using defaults.",
                    path, e
                );
                SessionSettings::default()
            }
        },
        Err(e) => {
            warn!(
                "[SETTINGS] failed to read {:?}: {}. Using defaults.",
                path, e
            );
            SessionSettings::default()
        }
    }
}

/// Save settings; failures are logged, not fatal
pub fn save_settings(settings: &SessionSettings) {
    let path = settings_path();
    if let Err(e) = try_save(settings, &path) {
        error!("[SETTINGS] failed to save settings to {:?}: {}", path, e);
    } else {
        info!("[SETTINGS] saved settings to {:?}", path);
    }
}

fn try_save(settings: &SessionSettings, path: &PathBuf) -> SessionResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    Ok(())
}
