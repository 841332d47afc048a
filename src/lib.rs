//! Core implementation of termlaunch
//!
//! termlaunch saves, per project, named groups of terminal commands and
//! replays them later by opening one terminal per command. Projects are kept
//! in a single JSON file and looked up either by name or by the workspace
//! root they were saved from.

use log::debug;

use crate::config_file::Settings;
use crate::store::{ProjectStore, StoreError};

pub mod config_file;
pub mod logger;
pub mod lookup;
pub mod projects;
pub mod prompt;
pub mod replay;
pub mod save;
pub mod store;
pub mod workspace;

/// Open and load the project store that `settings` points at.
///
/// # Errors
///
/// Returns `StoreError` if the projects file exists but cannot be read or parsed.
pub fn open_store(settings: &Settings) -> Result<ProjectStore, StoreError> {
    let path = settings.projects_file();
    debug!("Opening project store at {}", path.display());
    let mut store = ProjectStore::new(path);
    store.load()?;
    Ok(store)
}
