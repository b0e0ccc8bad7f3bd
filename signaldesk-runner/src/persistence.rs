//! Recent-predictions persistence: JSON save/load across restarts.

use std::path::Path;

use tracing::warn;

use signaldesk_core::{HistoryLog, TradePlan};

/// Load the saved log. Returns an empty log if the file is missing or corrupt.
///
/// Files holding more than the capacity are cut back to the newest entries.
pub fn load_history(path: &Path) -> HistoryLog {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return HistoryLog::new(),
    };
    match serde_json::from_str::<Vec<TradePlan>>(&content) {
        Ok(entries) => HistoryLog::from_entries(entries),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable history file");
            HistoryLog::new()
        }
    }
}

/// Save the log, newest first. Creates parent directories if needed.
pub fn save_history(path: &Path, log: &HistoryLog) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(log.entries())?;
    std::fs::write(path, json)?;
    Ok(())
}
