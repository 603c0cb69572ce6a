use std::{path::Path, process::Command};

use anyhow::{anyhow, bail, Context, Result};

use crate::storage::layout::Layout;

pub const TASKBAND_KEY: &str = r"HKCU\Software\Microsoft\Windows\CurrentVersion\Explorer\Taskband";

const LIST_START_APPS: &str =
    "Get-StartApps | Select-Object Name | Sort-Object Name | ForEach-Object { $_.Name }";

fn ensure_windows(action: &str) -> Result<()> {
    if !cfg!(target_os = "windows") {
        return Err(anyhow!("{} is only available on Windows.", action));
    }
    Ok(())
}

fn hidden(program: &str) -> Command {
    #[allow(unused_mut)]
    let mut cmd = Command::new(program);
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        cmd.creation_flags(0x08000000); // CREATE_NO_WINDOW
    }
    cmd
}

/// Kills every `explorer.exe` and starts a fresh shell so the taskbar reloads its pins.
pub fn restart_explorer() -> Result<()> {
    ensure_windows("Restarting Explorer")?;

    log::info!("Restarting Explorer");
    relaunch_shell(
        || {
            hidden("taskkill")
                .args(["/f", "/im", "explorer.exe"])
                .status()
                .map(|status| status.success())
        },
        || Command::new("explorer.exe").spawn().map(drop),
    )
}

// Explorer is started even when it was not running, so taskkill failing is not fatal.
fn relaunch_shell<K, S>(kill: K, spawn: S) -> Result<()>
where
    K: FnOnce() -> std::io::Result<bool>,
    S: FnOnce() -> std::io::Result<()>,
{
    match kill() {
        Ok(true) => {}
        Ok(false) => log::warn!("taskkill finished with a non-zero exit code, starting Explorer anyway"),
        Err(e) => log::warn!("Failed to execute taskkill: {}", e),
    }
    spawn().context("Failed to start explorer.exe")
}

/// Deletes the Taskband registry key holding the cached taskbar layout.
pub fn clear_taskband_cache() -> Result<()> {
    ensure_windows("Clearing the Taskband cache")?;

    let status = hidden("reg")
        .args(["delete", TASKBAND_KEY, "/f"])
        .status()
        .context("Failed to execute reg delete")?;
    if !status.success() {
        bail!(
            "Failed to clear Taskband registry key. Exit code: {:?}",
            status.code()
        );
    }
    Ok(())
}

pub fn open_folder(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("No backup folder found at: {}", path.display());
    }
    ensure_windows("Opening a folder in Explorer")?;

    Command::new("explorer")
        .arg(path)
        .spawn()
        .with_context(|| format!("Failed to open {} in Explorer", path.display()))?;
    Ok(())
}

/// Names of the applications listed in the Start menu.
pub fn installed_apps() -> Result<Vec<String>> {
    ensure_windows("Listing installed apps")?;

    let output = hidden("powershell")
        .args(["-NoProfile", "-Command", LIST_START_APPS])
        .output()
        .context("Failed to execute powershell")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let essential = stderr
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or_default();
        bail!("Failed to list installed apps: {}", essential);
    }

    Ok(parse_app_list(&String::from_utf8_lossy(&output.stdout)))
}

fn parse_app_list(stdout: &str) -> Vec<String> {
    let mut apps: Vec<String> = stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    apps.sort();
    apps.dedup();
    apps
}

/// Apps whose name mentions one of the shortcuts recorded in `layout`.
pub fn likely_pinned(apps: &[String], layout: &Layout) -> Vec<String> {
    let stems: Vec<String> = layout
        .classic
        .iter()
        .filter_map(|name| Path::new(name).file_stem())
        .map(|stem| stem.to_string_lossy().to_lowercase())
        .filter(|stem| !stem.is_empty())
        .collect();

    apps.iter()
        .filter(|app| {
            let app = app.to_lowercase();
            stems.iter().any(|stem| app.contains(stem.as_str()))
        })
        .cloned()
        .collect()
}
