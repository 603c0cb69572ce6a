// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(
    all(not(debug_assertions), feature = "gui"),
    windows_subsystem = "windows"
)]

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::debug;
use pinkeeper_lib::{
    open_vault, shell, ActivityLog, BackupOutcome, PinVault, RestoreOutcome, Settings,
};

#[derive(Debug, Parser)]
#[command(name = "pinkeeper", version, about = "Back up and restore Windows taskbar pinned shortcuts")]
struct Cli {
    /// Backup folder to use for this run instead of the saved one
    #[arg(long, global = true)]
    backup_dir: Option<PathBuf>,

    /// Layout file to use for this run instead of the saved one
    #[arg(long, global = true)]
    layout_file: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Copy the pinned shortcuts into the backup folder and save the layout
    Backup,
    /// Replace the pinned shortcuts with the ones in the backup folder
    Restore {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
        /// Restart Explorer afterwards so the taskbar picks up the changes
        #[arg(long)]
        restart: bool,
    },
    /// Remove every pinned shortcut and the cached taskbar layout
    Clear {
        #[arg(short, long)]
        yes: bool,
        #[arg(long)]
        restart: bool,
    },
    /// Show the shortcuts recorded by the last backup
    Layout,
    /// Open the backup folder in Explorer
    Open,
    /// Remember a new backup folder
    SetBackupDir { dir: PathBuf },
    /// Restart the Windows shell
    RestartExplorer,
    /// List apps from the Start menu
    Apps {
        /// Only apps that match a saved shortcut
        #[arg(long)]
        likely_pinned: bool,
    },
    /// Print the folders and files in use
    Paths,
    /// Open the desktop window
    #[cfg(feature = "gui")]
    Gui,
}

fn init_logging(quiet: bool, verbose: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let env = env_logger::Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env)
        .format_target(false)
        .format_timestamp(None)
        .try_init();
    debug!("Logger initialized with level: {}", default_level);
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn restart_explorer_logged(log: &mut ActivityLog) {
    log.push("Restarting Explorer...");
    match shell::restart_explorer() {
        Ok(()) => log.push("Explorer restarted successfully."),
        Err(e) => log.warn(format!("Failed to restart Explorer: {:#}", e)),
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings_path = Settings::default_path()?;
    let mut settings = Settings::load_or_default(&settings_path);
    if let Some(dir) = &cli.backup_dir {
        settings.backup_dir = Some(dir.clone());
    }
    if let Some(file) = &cli.layout_file {
        settings.layout_file = Some(file.clone());
    }
    let mut vault: PinVault = open_vault(&settings)?;
    let mut log = ActivityLog::new();

    match cli.command {
        Command::Backup => match vault.backup(&mut log)? {
            BackupOutcome::UpToDate { count } => {
                println!("{} shortcuts already backed up.", count)
            }
            BackupOutcome::Copied { copied, failed } => {
                println!("Backed up {} shortcuts ({} failed).", copied, failed)
            }
        },
        Command::Restore { yes, restart } => {
            if !yes
                && !confirm(
                    "This will REPLACE your current pinned taskbar shortcuts with the ones in the backup folder. Continue?",
                )?
            {
                log.push("Restore canceled by user.");
                return Ok(());
            }
            let outcome = vault.restore(&mut log)?;
            if let RestoreOutcome::Restored { removed, added, .. } = outcome {
                println!("Removed {} and restored {} shortcuts.", removed, added);
            }
            if outcome.added() > 0 {
                if restart {
                    restart_explorer_logged(&mut log);
                } else {
                    log.push("Restore complete (Explorer restart skipped).");
                }
            }
        }
        Command::Clear { yes, restart } => {
            if !yes
                && !confirm(
                    "This will remove ALL pinned programs from your taskbar. Make sure you have a backup first. Continue?",
                )?
            {
                log.push("Clear all taskbar pins canceled by user.");
                return Ok(());
            }
            vault.clear_pins(&mut log)?;
            match shell::clear_taskband_cache() {
                Ok(()) => log.push("Successfully cleared Taskband registry key (taskbar layout cache)."),
                Err(e) => log.warn(format!("{:#}", e)),
            }
            if restart {
                restart_explorer_logged(&mut log);
            } else {
                log.push("Explorer restart skipped, taskbar may show stale pins until Explorer restarts.");
            }
            log.push("Clear pins complete.");
        }
        Command::Layout => {
            let layout = vault.saved_layout()?;
            println!("Classic Shortcuts:");
            for item in &layout.classic {
                println!("  • {}", item);
            }
        }
        Command::Open => shell::open_folder(vault.backup_dir())?,
        Command::SetBackupDir { dir } => {
            vault.set_backup_dir(dir.clone(), &mut log);
            let mut saved = Settings::load_or_default(&settings_path);
            saved.backup_dir = Some(dir);
            saved.save_to(&settings_path)?;
        }
        Command::RestartExplorer => shell::restart_explorer()?,
        Command::Apps { likely_pinned } => {
            let apps = shell::installed_apps()?;
            let apps = if likely_pinned {
                shell::likely_pinned(&apps, &vault.saved_layout()?)
            } else {
                apps
            };
            for app in apps {
                println!("{}", app);
            }
        }
        Command::Paths => {
            println!("Pinned folder: {}", vault.pinned_dir().display());
            println!("Backup folder: {}", vault.backup_dir().display());
            println!("Layout file:   {}", vault.layout_file().display());
            println!("Settings:      {}", settings_path.display());
        }
        #[cfg(feature = "gui")]
        Command::Gui => pinkeeper_lib::run(),
    }

    if log.warnings() > 0 {
        eprintln!("{} problem(s) reported, see log above.", log.warnings());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    // The desktop window installs its own logger.
    #[cfg(feature = "gui")]
    let gui = matches!(cli.command, Command::Gui);
    #[cfg(not(feature = "gui"))]
    let gui = false;
    if !gui {
        init_logging(cli.quiet, cli.verbose);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
