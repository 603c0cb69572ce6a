use anyhow::Result;

pub mod activity;
pub mod pins;
pub mod settings;
pub mod shell;
pub mod storage;

#[cfg(feature = "gui")]
mod commands;

pub use activity::ActivityLog;
pub use settings::Settings;
pub use storage::{
    layout::Layout,
    ops::{BackupOutcome, PinVault, RestoreOutcome},
};

/// Builds a vault over the current user's taskbar folder using the paths in `settings`.
pub fn open_vault(settings: &Settings) -> Result<PinVault> {
    Ok(PinVault::new(
        pins::taskbar_dir()?,
        settings.backup_dir()?,
        settings.layout_file()?,
    ))
}

#[cfg(feature = "gui")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let state = commands::AppState::load().expect("failed to locate taskbar folders");

    tauri::Builder::default()
        .plugin(
            tauri_plugin_log::Builder::new()
                .target(tauri_plugin_log::Target::new(
                    tauri_plugin_log::TargetKind::Webview,
                ))
                .level(log::LevelFilter::Info)
                .build(),
        )
        .plugin(tauri_plugin_dialog::init())
        .manage(state)
        .invoke_handler(tauri::generate_handler![
            commands::backup,
            commands::restore,
            commands::clear_all_pins,
            commands::view_saved_layout,
            commands::open_backup_folder,
            commands::change_backup_folder,
            commands::restart_explorer,
            commands::current_paths,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
