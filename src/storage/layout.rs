use std::{fs, path::Path};

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

use crate::pins::is_duplicate;

pub const LAYOUT_FILE_NAME: &str = "layout.json";

/// Filenames captured by the last backup.
///
/// Files written by older releases also carry a `"uwp"` list; unknown keys
/// are ignored when reading and never written back.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Layout {
    #[serde(default)]
    pub classic: Vec<String>,
}

impl Layout {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classic: Vec<String> = names.into_iter().map(Into::into).collect();
        classic.sort();
        classic.dedup();
        Self { classic }
    }

    pub fn is_empty(&self) -> bool {
        self.classic.is_empty()
    }

    pub fn load_from(path: &Path) -> Result<Self, anyhow::Error> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout {}", path.display()))?;
        let mut layout: Layout = serde_json::from_str(&content)
            .with_context(|| format!("Invalid layout file {}", path.display()))?;
        layout.classic.retain(|name| !is_duplicate(name));
        Ok(layout)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), anyhow::Error> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow!("layout path has no parent: {}", path.display()))?;
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write layout {}", path.display()))?;
        Ok(())
    }
}
