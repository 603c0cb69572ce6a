use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::storage::layout::LAYOUT_FILE_NAME;

pub const DEFAULT_BACKUP_DIR_NAME: &str = "taskbar_backup";
const SETTINGS_FILE_NAME: &str = "settings.json";

/// User choices that outlive a single run.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_file: Option<PathBuf>,
}

impl Settings {
    pub fn default_path() -> Result<PathBuf> {
        let proj = directories::ProjectDirs::from("com", "pinkeeper", "pinkeeper")
            .ok_or_else(|| anyhow!("cannot get project dir"))?;
        Ok(proj.config_dir().join(SETTINGS_FILE_NAME))
    }

    /// Loads settings, falling back to defaults when the file is absent or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring settings file {}: {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write settings {}", path.display()))?;
        Ok(())
    }

    pub fn backup_dir(&self) -> Result<PathBuf> {
        match &self.backup_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(program_dir()?.join(DEFAULT_BACKUP_DIR_NAME)),
        }
    }

    pub fn layout_file(&self) -> Result<PathBuf> {
        match &self.layout_file {
            Some(file) => Ok(file.clone()),
            None => Ok(program_dir()?.join(LAYOUT_FILE_NAME)),
        }
    }
}

/// Directory holding the running executable.
pub fn program_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to get exe path")?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("No parent directory for executable"))
}
