use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::WalkDir;

/// Location of the per-user pinned taskbar shortcuts, relative to `%APPDATA%`.
pub const TASKBAR_SUBDIR: [&str; 5] = [
    "Microsoft",
    "Internet Explorer",
    "Quick Launch",
    "User Pinned",
    "TaskBar",
];

pub const SHORTCUT_EXTENSION: &str = "lnk";

// Windows names a second copy of an existing shortcut "Name (2).lnk".
static DUPLICATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\d+\)\.lnk$").expect("valid duplicate pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutFilter {
    All,
    SkipDuplicates,
}

pub fn taskbar_dir() -> Result<PathBuf> {
    let appdata = std::env::var_os("APPDATA")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Failed to get APPDATA"))?;
    Ok(TASKBAR_SUBDIR
        .iter()
        .fold(appdata, |path, part| path.join(part)))
}

pub fn is_duplicate(file_name: &str) -> bool {
    DUPLICATE_PATTERN.is_match(file_name)
}

pub fn is_shortcut(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(SHORTCUT_EXTENSION))
        .unwrap_or(false)
}

/// Shortcut files directly inside `dir`, sorted by file name.
///
/// A directory that does not exist has no shortcuts.
pub fn list_shortcuts(dir: &Path, filter: ShortcutFilter) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut shortcuts = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to read {}", dir.display()))?;
        if !entry.file_type().is_file() || !is_shortcut(entry.path()) {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if filter == ShortcutFilter::SkipDuplicates && is_duplicate(&name) {
            continue;
        }
        shortcuts.push(entry.into_path());
    }
    Ok(shortcuts)
}

pub fn shortcut_names(dir: &Path, filter: ShortcutFilter) -> Result<BTreeSet<String>> {
    Ok(list_shortcuts(dir, filter)?
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect())
}
