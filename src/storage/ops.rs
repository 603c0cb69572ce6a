use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context};
use serde::Serialize;

use crate::{
    activity::ActivityLog,
    pins::{self, ShortcutFilter},
    storage::layout::Layout,
};

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BackupOutcome {
    /// The backup already holds exactly the currently pinned shortcuts.
    UpToDate { count: usize },
    Copied { copied: usize, failed: usize },
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RestoreOutcome {
    NothingToRestore,
    Restored {
        removed: usize,
        added: usize,
        failed: usize,
    },
}

impl RestoreOutcome {
    pub fn added(&self) -> usize {
        match self {
            RestoreOutcome::NothingToRestore => 0,
            RestoreOutcome::Restored { added, .. } => *added,
        }
    }
}

/// Moves pinned shortcuts between the taskbar folder and a backup folder.
#[derive(Debug, Clone)]
pub struct PinVault {
    pinned_dir: PathBuf,
    backup_dir: PathBuf,
    layout_file: PathBuf,
}

impl PinVault {
    pub fn new(pinned_dir: PathBuf, backup_dir: PathBuf, layout_file: PathBuf) -> Self {
        Self {
            pinned_dir,
            backup_dir,
            layout_file,
        }
    }

    pub fn pinned_dir(&self) -> &Path {
        &self.pinned_dir
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn layout_file(&self) -> &Path {
        &self.layout_file
    }

    pub fn set_backup_dir(&mut self, dir: PathBuf, log: &mut ActivityLog) {
        log.push(format!("Backup folder changed to: {}", dir.display()));
        self.backup_dir = dir;
    }

    pub fn backup(&self, log: &mut ActivityLog) -> Result<BackupOutcome, anyhow::Error> {
        if !self.pinned_dir.exists() {
            return Err(anyhow!(
                "Pinned taskbar folder does not exist: {}",
                self.pinned_dir.display()
            ));
        }
        fs::create_dir_all(&self.backup_dir).with_context(|| {
            format!("Failed to create backup folder {}", self.backup_dir.display())
        })?;

        let current = pins::shortcut_names(&self.pinned_dir, ShortcutFilter::SkipDuplicates)?;
        let existing = pins::shortcut_names(&self.backup_dir, ShortcutFilter::All)?;

        if current == existing {
            log.push("No new shortcuts to save, everything already backed up.");
            self.save_layout(Layout::new(current.iter().cloned()), log)?;
            return Ok(BackupOutcome::UpToDate {
                count: current.len(),
            });
        }

        log.push("Backing up pinned shortcuts...");
        for stale in pins::list_shortcuts(&self.backup_dir, ShortcutFilter::All)? {
            if let Err(e) = fs::remove_file(&stale) {
                log.warn(format!("Failed to remove old backup {}: {}", stale.display(), e));
            }
        }

        let mut copied = 0;
        let mut failed = 0;
        for shortcut in pins::list_shortcuts(&self.pinned_dir, ShortcutFilter::SkipDuplicates)? {
            match copy_into(&shortcut, &self.backup_dir) {
                Ok(()) => copied += 1,
                Err(e) => {
                    failed += 1;
                    log.warn(format!("Failed to backup {}: {}", shortcut.display(), e));
                }
            }
        }
        log.push(format!("Backed up {} classic pinned shortcuts.", copied));

        let saved = pins::shortcut_names(&self.backup_dir, ShortcutFilter::All)?;
        self.save_layout(Layout::new(saved), log)?;

        Ok(BackupOutcome::Copied { copied, failed })
    }

    /// Replaces every pinned shortcut with the ones in the backup folder.
    pub fn restore(&self, log: &mut ActivityLog) -> Result<RestoreOutcome, anyhow::Error> {
        if !self.backup_dir.exists() {
            return Err(anyhow!(
                "No backup folder found at: {}",
                self.backup_dir.display()
            ));
        }

        let backups = pins::list_shortcuts(&self.backup_dir, ShortcutFilter::All)?;
        if backups.is_empty() {
            log.push("No .lnk files were found in the selected backup folder.");
            return Ok(RestoreOutcome::NothingToRestore);
        }

        fs::create_dir_all(&self.pinned_dir).with_context(|| {
            format!(
                "Failed to access the taskbar pinned folder {}",
                self.pinned_dir.display()
            )
        })?;

        log.push(format!(
            "Restoring pinned shortcuts from: {}",
            self.backup_dir.display()
        ));

        let removed = self.remove_pinned(log)?;

        let mut added = 0;
        let mut failed = 0;
        for src in &backups {
            match copy_into(src, &self.pinned_dir) {
                Ok(()) => added += 1,
                Err(e) => {
                    failed += 1;
                    log.warn(format!("Failed to restore shortcut {}: {}", src.display(), e));
                }
            }
        }

        log.push(format!("Removed {} existing pinned shortcuts.", removed));
        log.push(format!("Restored {} shortcuts from backup.", added));
        if added == 0 {
            log.warn("No shortcuts were restored (all copies failed).");
        }

        Ok(RestoreOutcome::Restored {
            removed,
            added,
            failed,
        })
    }

    /// Deletes every pinned shortcut. Returns how many were removed.
    pub fn clear_pins(&self, log: &mut ActivityLog) -> Result<usize, anyhow::Error> {
        if !self.pinned_dir.exists() {
            log.warn(format!(
                "Pinned taskbar folder does not exist: {}",
                self.pinned_dir.display()
            ));
            return Ok(0);
        }
        log.push("Clearing all taskbar pins...");
        let removed = self.remove_pinned(log)?;
        log.push(format!(
            "Deleted {} .lnk files from pinned taskbar folder.",
            removed
        ));
        Ok(removed)
    }

    pub fn saved_layout(&self) -> Result<Layout, anyhow::Error> {
        Layout::load_from(&self.layout_file)
    }

    fn save_layout(&self, layout: Layout, log: &mut ActivityLog) -> Result<(), anyhow::Error> {
        layout.save_to(&self.layout_file)?;
        log.push(format!("Layout saved to {}.", self.layout_file.display()));
        Ok(())
    }

    fn remove_pinned(&self, log: &mut ActivityLog) -> Result<usize, anyhow::Error> {
        let mut removed = 0;
        for shortcut in pins::list_shortcuts(&self.pinned_dir, ShortcutFilter::All)? {
            match fs::remove_file(&shortcut) {
                Ok(()) => removed += 1,
                Err(e) => log.warn(format!(
                    "Failed to delete pinned shortcut {}: {}",
                    shortcut.display(),
                    e
                )),
            }
        }
        Ok(removed)
    }
}

fn copy_into(src: &Path, dest_dir: &Path) -> Result<(), anyhow::Error> {
    let name = src
        .file_name()
        .ok_or_else(|| anyhow!("shortcut without file name: {}", src.display()))?;
    fs::copy(src, dest_dir.join(name))?;
    Ok(())
}
