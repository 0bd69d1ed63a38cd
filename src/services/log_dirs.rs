//! Where diagnostics go
//!
//! Each run writes `triplog-{PID}.log` under `$XDG_STATE_HOME/triplog/logs/`
//! (usually `~/.local/state/triplog/logs/`), falling back to the temp dir.
//! Logs of other runs are removed once they are a day old.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

const APP_DIR: &str = "triplog";
const MAX_LOG_AGE: Duration = Duration::from_secs(24 * 60 * 60);

static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// The log directory, created on first use
pub fn log_dir() -> &'static Path {
    LOG_DIR.get_or_init(|| {
        let fallback = std::env::temp_dir().join(format!("{}-logs", APP_DIR));
        if let Some(dir) = state_log_dir() {
            match fs::create_dir_all(&dir) {
                Ok(()) => return dir,
                Err(e) => tracing::warn!("Cannot create {}: {}", dir.display(), e),
            }
        }
        let _ = fs::create_dir_all(&fallback);
        fallback
    })
}

fn state_log_dir() -> Option<PathBuf> {
    let state_home = std::env::var_os("XDG_STATE_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("state")))?;
    Some(state_home.join(APP_DIR).join("logs"))
}

pub fn main_log_path() -> PathBuf {
    log_dir().join(log_file_name(std::process::id()))
}

fn log_file_name(pid: u32) -> String {
    format!("{}-{}.log", APP_DIR, pid)
}

/// PID of the run that wrote `name`, if it is one of our log files
fn log_file_pid(name: &str) -> Option<u32> {
    name.strip_prefix(APP_DIR)?
        .strip_prefix('-')?
        .strip_suffix(".log")?
        .parse()
        .ok()
}

pub fn cleanup_stale_logs() {
    let removed = remove_stale_logs(log_dir(), std::process::id(), SystemTime::now());
    if removed > 0 {
        tracing::debug!("Removed {} stale log files", removed);
    }
}

/// Delete other runs' logs last modified more than a day before `now`.
/// Returns how many were removed.
fn remove_stale_logs(dir: &Path, current_pid: u32, now: SystemTime) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let other_run =
            log_file_pid(&name.to_string_lossy()).is_some_and(|pid| pid != current_pid);
        if !other_run {
            continue;
        }
        let stale = entry
            .metadata()
            .ok()
            .filter(|m| m.is_file())
            .and_then(|m| m.modified().ok())
            .and_then(|modified| now.duration_since(modified).ok())
            .is_some_and(|age| age > MAX_LOG_AGE);
        if stale && fs::remove_file(entry.path()).is_ok() {
            removed += 1;
        }
    }
    removed
}
