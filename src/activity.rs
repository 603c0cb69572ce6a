use std::fmt;

use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
}

#[derive(Serialize, Clone, Debug)]
pub struct ActivityEntry {
    pub at: DateTime<Local>,
    pub level: Level,
    pub message: String,
}

impl fmt::Display for ActivityEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

/// Status log shown to the user. Every line is also sent to the `log` facade.
#[derive(Serialize, Default, Debug)]
pub struct ActivityLog {
    entries: Vec<ActivityEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{}", message);
        self.record(Level::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.record(Level::Warn, message);
    }

    fn record(&mut self, level: Level, message: String) {
        self.entries.push(ActivityEntry {
            at: Local::now(),
            level,
            message,
        });
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.message.clone()).collect()
    }

    pub fn warnings(&self) -> usize {
        self.entries.iter().filter(|e| e.level == Level::Warn).count()
    }

    /// Status lines gathered so far followed by the error that stopped the action.
    pub fn failure(&self, error: &anyhow::Error) -> String {
        let mut lines = self.messages();
        lines.push(format!("{:#}", error));
        lines.join("\n")
    }
}

impl fmt::Display for ActivityLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}
