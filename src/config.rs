use crate::model::DEFAULT_NAME;
use crate::rules::{DecayProfile, Rules};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub decay_profile: DecayProfile,
    /// Fixed seed for the game opponents; entropy when unset.
    pub seed: Option<u64>,
    /// Name given to a freshly hatched pet.
    pub pet_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            decay_profile: DecayProfile::default(),
            seed: None,
            pet_name: DEFAULT_NAME.to_string(),
        }
    }
}

impl Settings {
    pub fn rules(&self) -> Rules {
        Rules::for_profile(self.decay_profile)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paths {
    pub save_path: PathBuf,
    pub settings_path: PathBuf,
}

impl Paths {
    /// Both files inside `dir`, for callers that manage their own location.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            save_path: dir.join("save.json"),
            settings_path: dir.join("settings.json"),
        }
    }
}

pub fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "kota", "Kota")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir();
    fs::create_dir_all(dir)
        .with_context(|| format!("could not create {}", dir.display()))?;
    Ok(Paths::in_dir(dir))
}

pub fn load_settings(path: &Path) -> Settings {
    let Ok(s) = fs::read_to_string(path) else {
        return Settings::default();
    };
    match serde_json::from_str::<Settings>(&s) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("ignoring unreadable settings {}: {}", path.display(), e);
            Settings::default()
        }
    }
}

pub fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data).with_context(|| format!("could not write {}", tmp.display()))?;
    atomic_rename(&tmp, path)
}

/// Replaces `to` with `from`. Both must live on the same filesystem.
pub(crate) fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to)
        .with_context(|| format!("could not move {} to {}", from.display(), to.display()))?;
    Ok(())
}
