use crate::config::atomic_rename;
use crate::error::LoadError;
use crate::model::{PetState, SAVE_VERSION};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::{fs, io, path::Path};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadSource {
    /// No save existed; a new pet was hatched.
    Fresh,
    Restored,
    /// The save was unreadable and has been replaced by a new pet.
    Recovered(String),
}

#[derive(Clone, Debug)]
pub struct Loaded {
    pub state: PetState,
    pub source: LoadSource,
}

fn read_state(path: &Path) -> Result<PetState, LoadError> {
    let s = fs::read_to_string(path)?;
    Ok(serde_json::from_str::<PetState>(&s)?)
}

/// Never fails: a missing save hatches `name`, a broken one is logged and
/// replaced.
pub fn load_or_init(path: &Path, name: &str, now: DateTime<Utc>) -> Loaded {
    match read_state(path) {
        Ok(state) => {
            if state.version > SAVE_VERSION {
                log::warn!(
                    "save {} has version {}, newer than {}",
                    path.display(),
                    state.version,
                    SAVE_VERSION
                );
            }
            Loaded {
                state,
                source: LoadSource::Restored,
            }
        }
        Err(LoadError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Loaded {
            state: PetState::new(name, now),
            source: LoadSource::Fresh,
        },
        Err(e) => {
            log::warn!("starting over, {}: {}", path.display(), e);
            Loaded {
                state: PetState::new(name, now),
                source: LoadSource::Recovered(e.to_string()),
            }
        }
    }
}

pub fn save_atomic(path: &Path, state: &PetState) -> Result<()> {
    let mut state = state.clone();
    state.version = SAVE_VERSION;
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(&state)?;
    fs::write(&tmp, data).with_context(|| format!("could not write {}", tmp.display()))?;
    atomic_rename(&tmp, path)
}

/// Deletes the save. Returns whether there was one.
pub fn reset(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("could not delete {}", path.display())),
    }
}
