#[cfg(test)]
mod integration_tests {
    use std::{collections::BTreeSet, fs, path::Path};

    use tempfile::TempDir;

    use crate::{
        activity::ActivityLog,
        pins::{shortcut_names, ShortcutFilter},
        storage::ops::{BackupOutcome, PinVault, RestoreOutcome},
    };

    struct Fixture {
        _root: TempDir,
        vault: PinVault,
    }

    impl Fixture {
        fn new() -> Result<Self, anyhow::Error> {
            let root = TempDir::new()?;
            let pinned = root.path().join("TaskBar");
            fs::create_dir_all(&pinned)?;
            let vault = PinVault::new(
                pinned,
                root.path().join("taskbar_backup"),
                root.path().join("layout.json"),
            );
            Ok(Self { _root: root, vault })
        }

        fn pin(&self, names: &[&str]) -> Result<(), anyhow::Error> {
            write_shortcuts(self.vault.pinned_dir(), names)
        }
    }

    fn write_shortcuts(dir: &Path, names: &[&str]) -> Result<(), anyhow::Error> {
        fs::create_dir_all(dir)?;
        for name in names {
            fs::write(dir.join(name), format!("shortcut:{name}"))?;
        }
        Ok(())
    }

    fn names(dir: &Path) -> Result<BTreeSet<String>, anyhow::Error> {
        shortcut_names(dir, ShortcutFilter::All)
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_backup_skips_duplicates() -> Result<(), anyhow::Error> {
        let fx = Fixture::new()?;
        fx.pin(&["Firefox.lnk", "Terminal.lnk", "Code.lnk"])?;
        fx.pin(&["Firefox (2).lnk", "Code (3).lnk"])?;

        let mut log = ActivityLog::new();
        let outcome = fx.vault.backup(&mut log)?;

        assert_eq!(outcome, BackupOutcome::Copied { copied: 3, failed: 0 });
        assert_eq!(
            names(fx.vault.backup_dir())?,
            set(&["Code.lnk", "Firefox.lnk", "Terminal.lnk"])
        );
        assert_eq!(
            fx.vault.saved_layout()?.classic,
            vec!["Code.lnk", "Firefox.lnk", "Terminal.lnk"]
        );
        Ok(())
    }

    #[test]
    fn test_backup_replaces_stale_shortcuts() -> Result<(), anyhow::Error> {
        let fx = Fixture::new()?;
        fx.pin(&["Firefox.lnk"])?;
        write_shortcuts(fx.vault.backup_dir(), &["Old.lnk"])?;
        fs::write(fx.vault.backup_dir().join("readme.txt"), "keep me")?;

        let mut log = ActivityLog::new();
        fx.vault.backup(&mut log)?;

        assert_eq!(names(fx.vault.backup_dir())?, set(&["Firefox.lnk"]));
        assert!(fx.vault.backup_dir().join("readme.txt").exists());
        Ok(())
    }

    #[test]
    fn test_identical_backup_performs_no_copy() -> Result<(), anyhow::Error> {
        let fx = Fixture::new()?;
        fx.pin(&["Firefox.lnk", "Terminal.lnk"])?;

        let mut log = ActivityLog::new();
        fx.vault.backup(&mut log)?;

        // Content changes alone must not trigger a new copy.
        fs::write(fx.vault.pinned_dir().join("Firefox.lnk"), "changed")?;

        let outcome = fx.vault.backup(&mut log)?;
        assert_eq!(outcome, BackupOutcome::UpToDate { count: 2 });
        assert_eq!(
            fs::read_to_string(fx.vault.backup_dir().join("Firefox.lnk"))?,
            "shortcut:Firefox.lnk"
        );
        assert!(log
            .messages()
            .iter()
            .any(|m| m.starts_with("No new shortcuts to save")));
        Ok(())
    }

    #[test]
    fn test_backup_without_pinned_folder_fails() -> Result<(), anyhow::Error> {
        let root = TempDir::new()?;
        let vault = PinVault::new(
            root.path().join("missing"),
            root.path().join("backup"),
            root.path().join("layout.json"),
        );

        let mut log = ActivityLog::new();
        assert!(vault.backup(&mut log).is_err());
        assert!(!root.path().join("layout.json").exists());
        Ok(())
    }

    #[test]
    fn test_backup_continues_past_failed_copy() -> Result<(), anyhow::Error> {
        let fx = Fixture::new()?;
        fx.pin(&["A.lnk", "B.lnk"])?;
        // A folder with a shortcut's name cannot be overwritten by a file copy.
        fs::create_dir_all(fx.vault.backup_dir().join("A.lnk"))?;

        let mut log = ActivityLog::new();
        let outcome = fx.vault.backup(&mut log)?;

        assert_eq!(outcome, BackupOutcome::Copied { copied: 1, failed: 1 });
        assert_eq!(fx.vault.saved_layout()?.classic, vec!["B.lnk"]);
        assert_eq!(log.warnings(), 1);
        assert!(log
            .messages()
            .iter()
            .any(|m| m.starts_with("Failed to backup") && m.contains("A.lnk")));
        Ok(())
    }

    #[test]
    fn test_restore_continues_past_failed_copy() -> Result<(), anyhow::Error> {
        let fx = Fixture::new()?;
        write_shortcuts(fx.vault.backup_dir(), &["A.lnk", "B.lnk"])?;
        fs::create_dir_all(fx.vault.pinned_dir().join("A.lnk"))?;

        let mut log = ActivityLog::new();
        let outcome = fx.vault.restore(&mut log)?;

        assert_eq!(
            outcome,
            RestoreOutcome::Restored {
                removed: 0,
                added: 1,
                failed: 1
            }
        );
        assert_eq!(names(fx.vault.pinned_dir())?, set(&["B.lnk"]));
        assert!(log
            .messages()
            .iter()
            .any(|m| m.starts_with("Failed to restore shortcut") && m.contains("A.lnk")));
        Ok(())
    }

    #[test]
    fn test_restore_replaces_pinned_set() -> Result<(), anyhow::Error> {
        let fx = Fixture::new()?;
        write_shortcuts(fx.vault.backup_dir(), &["Firefox.lnk", "Terminal.lnk"])?;
        fx.pin(&["Edge.lnk", "Store.lnk", "Terminal.lnk"])?;
        fs::write(fx.vault.pinned_dir().join("desktop.ini"), "")?;

        let mut log = ActivityLog::new();
        let outcome = fx.vault.restore(&mut log)?;

        assert_eq!(
            outcome,
            RestoreOutcome::Restored {
                removed: 3,
                added: 2,
                failed: 0
            }
        );
        assert_eq!(
            names(fx.vault.pinned_dir())?,
            names(fx.vault.backup_dir())?
        );
        assert!(fx.vault.pinned_dir().join("desktop.ini").exists());
        Ok(())
    }

    #[test]
    fn test_restore_creates_pinned_folder() -> Result<(), anyhow::Error> {
        let root = TempDir::new()?;
        let backup = root.path().join("backup");
        write_shortcuts(&backup, &["Firefox.lnk"])?;
        let vault = PinVault::new(
            root.path().join("TaskBar"),
            backup,
            root.path().join("layout.json"),
        );

        let mut log = ActivityLog::new();
        let outcome = vault.restore(&mut log)?;

        assert_eq!(outcome.added(), 1);
        assert_eq!(names(vault.pinned_dir())?, set(&["Firefox.lnk"]));
        Ok(())
    }

    #[test]
    fn test_restore_with_empty_backup_leaves_pins() -> Result<(), anyhow::Error> {
        let fx = Fixture::new()?;
        fx.pin(&["Firefox.lnk"])?;
        fs::create_dir_all(fx.vault.backup_dir())?;

        let mut log = ActivityLog::new();
        let outcome = fx.vault.restore(&mut log)?;

        assert_eq!(outcome, RestoreOutcome::NothingToRestore);
        assert_eq!(names(fx.vault.pinned_dir())?, set(&["Firefox.lnk"]));
        Ok(())
    }

    #[test]
    fn test_restore_without_backup_folder_fails() -> Result<(), anyhow::Error> {
        let fx = Fixture::new()?;
        fx.pin(&["Firefox.lnk"])?;

        let mut log = ActivityLog::new();
        let err = fx.vault.restore(&mut log).unwrap_err();
        assert!(err.to_string().contains("No backup folder found"));
        assert_eq!(names(fx.vault.pinned_dir())?, set(&["Firefox.lnk"]));
        Ok(())
    }

    #[test]
    fn test_clear_pins_removes_only_shortcuts() -> Result<(), anyhow::Error> {
        let fx = Fixture::new()?;
        fx.pin(&["Firefox.lnk", "Firefox (2).lnk"])?;
        fs::write(fx.vault.pinned_dir().join("desktop.ini"), "")?;

        let mut log = ActivityLog::new();
        assert_eq!(fx.vault.clear_pins(&mut log)?, 2);
        assert!(names(fx.vault.pinned_dir())?.is_empty());
        assert!(fx.vault.pinned_dir().join("desktop.ini").exists());
        Ok(())
    }

    #[test]
    fn test_clear_pins_missing_folder() -> Result<(), anyhow::Error> {
        let root = TempDir::new()?;
        let vault = PinVault::new(
            root.path().join("missing"),
            root.path().join("backup"),
            root.path().join("layout.json"),
        );

        let mut log = ActivityLog::new();
        assert_eq!(vault.clear_pins(&mut log)?, 0);
        assert_eq!(log.warnings(), 1);
        Ok(())
    }

    #[test]
    fn test_backup_then_restore_roundtrip() -> Result<(), anyhow::Error> {
        let mut fx = Fixture::new()?;
        fx.pin(&["Firefox.lnk", "Terminal.lnk", "Terminal (2).lnk"])?;

        let mut log = ActivityLog::new();
        fx.vault.backup(&mut log)?;
        fx.vault.clear_pins(&mut log)?;
        fx.vault.restore(&mut log)?;

        assert_eq!(
            names(fx.vault.pinned_dir())?,
            set(&["Firefox.lnk", "Terminal.lnk"])
        );

        let elsewhere = fx.vault.backup_dir().with_file_name("other_backup");
        fx.vault.set_backup_dir(elsewhere.clone(), &mut log);
        assert_eq!(fx.vault.backup_dir(), elsewhere.as_path());
        assert!(log
            .messages()
            .last()
            .unwrap()
            .starts_with("Backup folder changed to:"));
        Ok(())
    }
}
