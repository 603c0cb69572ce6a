// Learn more about Tauri commands at https://tauri.app/develop/calling-rust/

use std::{path::PathBuf, sync::Mutex};

use serde::Serialize;
use tauri::{AppHandle, State};
use tauri_plugin_dialog::DialogExt;

use crate::{
    activity::ActivityLog,
    settings::Settings,
    shell,
    storage::{
        layout::Layout,
        ops::{BackupOutcome, PinVault, RestoreOutcome},
    },
};

pub struct AppState {
    vault: Mutex<PinVault>,
    settings: Mutex<Settings>,
    settings_path: PathBuf,
}

impl AppState {
    pub fn load() -> Result<Self, anyhow::Error> {
        let settings_path = Settings::default_path()?;
        let settings = Settings::load_or_default(&settings_path);
        let vault = crate::open_vault(&settings)?;
        Ok(Self {
            vault: Mutex::new(vault),
            settings: Mutex::new(settings),
            settings_path,
        })
    }

    fn vault(&self) -> Result<std::sync::MutexGuard<'_, PinVault>, String> {
        self.vault.lock().map_err(|e| e.to_string())
    }
}

/// What an action did plus the status lines it produced.
#[derive(Serialize)]
pub struct Report<T> {
    pub outcome: T,
    pub log: Vec<String>,
}

impl<T> Report<T> {
    fn new(outcome: T, log: ActivityLog) -> Self {
        Self {
            outcome,
            log: log.messages(),
        }
    }
}

#[derive(Serialize)]
pub struct Paths {
    pub pinned_dir: String,
    pub backup_dir: String,
    pub layout_file: String,
}

#[tauri::command]
pub fn backup(state: State<'_, AppState>) -> Result<Report<BackupOutcome>, String> {
    let mut log = ActivityLog::new();
    let outcome = state.vault()?.backup(&mut log).map_err(|e| log.failure(&e))?;
    Ok(Report::new(outcome, log))
}

#[tauri::command]
pub fn restore(state: State<'_, AppState>) -> Result<Report<RestoreOutcome>, String> {
    let mut log = ActivityLog::new();
    let outcome = state.vault()?.restore(&mut log).map_err(|e| log.failure(&e))?;
    Ok(Report::new(outcome, log))
}

#[tauri::command]
pub fn clear_all_pins(state: State<'_, AppState>) -> Result<Report<usize>, String> {
    let mut log = ActivityLog::new();
    let removed = state
        .vault()?
        .clear_pins(&mut log)
        .map_err(|e| log.failure(&e))?;
    match shell::clear_taskband_cache() {
        Ok(()) => log.push("Successfully cleared Taskband registry key (taskbar layout cache)."),
        Err(e) => log.warn(format!("{:#}", e)),
    }
    Ok(Report::new(removed, log))
}

#[tauri::command]
pub fn view_saved_layout(state: State<'_, AppState>) -> Result<Layout, String> {
    state.vault()?.saved_layout().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn open_backup_folder(state: State<'_, AppState>) -> Result<(), String> {
    let dir = state.vault()?.backup_dir().to_path_buf();
    shell::open_folder(&dir).map_err(|e| e.to_string())
}

// Async so the blocking folder picker does not run on the main thread.
#[tauri::command]
pub async fn change_backup_folder(
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<Report<Option<String>>, String> {
    let mut log = ActivityLog::new();
    let initial = state.vault()?.backup_dir().to_path_buf();
    let picked = app
        .dialog()
        .file()
        .set_title("Select Backup Folder")
        .set_directory(&initial)
        .blocking_pick_folder();

    let Some(picked) = picked else {
        return Ok(Report::new(None, log));
    };
    let dir = picked.into_path().map_err(|e| e.to_string())?;

    state.vault()?.set_backup_dir(dir.clone(), &mut log);
    let mut settings = state.settings.lock().map_err(|e| e.to_string())?;
    settings.backup_dir = Some(dir.clone());
    if let Err(e) = settings.save_to(&state.settings_path) {
        log.warn(format!("Failed to save settings: {:#}", e));
    }
    Ok(Report::new(Some(dir.display().to_string()), log))
}

#[tauri::command]
pub fn restart_explorer() -> Result<(), String> {
    shell::restart_explorer().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn current_paths(state: State<'_, AppState>) -> Result<Paths, String> {
    let vault = state.vault()?;
    Ok(Paths {
        pinned_dir: vault.pinned_dir().display().to_string(),
        backup_dir: vault.backup_dir().display().to_string(),
        layout_file: vault.layout_file().display().to_string(),
    })
}
