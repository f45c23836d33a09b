//! Where the terminal client keeps its files.
//!
//! Layouts go to the platform data directory, session logs to a `logs`
//! folder under the cache directory.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

const LATEST_LOG: &str = "latest.log";
const ARCHIVE_PREFIX: &str = "session-";

/// Resolved data and log locations.
#[derive(Debug, Clone)]
pub struct AppPaths {
    data: PathBuf,
    logs: PathBuf,
}

impl AppPaths {
    /// Resolves the platform directories. `None` without a home directory.
    pub fn resolve() -> Option<Self> {
        let dirs = ProjectDirs::from("dev", "opsgrid", "opsgrid")?;
        Some(Self {
            data: dirs.data_dir().to_path_buf(),
            logs: dirs.cache_dir().join("logs"),
        })
    }

    #[cfg(test)]
    fn under(root: &Path) -> Self {
        Self {
            data: root.join("data"),
            logs: root.join("logs"),
        }
    }

    /// The layout database.
    pub fn layouts_db(&self) -> PathBuf {
        self.data.join("layouts.db")
    }

    /// Log file of the running session.
    pub fn log_file(&self) -> PathBuf {
        self.logs.join(LATEST_LOG)
    }

    /// Archives the previous session's log and keeps at most `keep` archives.
    pub fn rotate_logs(&self, keep: usize) -> io::Result<()> {
        fs::create_dir_all(&self.logs)?;

        let latest = self.log_file();
        if latest.exists() {
            let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
            fs::rename(&latest, self.logs.join(format!("{}{}.log", ARCHIVE_PREFIX, stamp)))?;
        }

        let archives = archived_logs(&self.logs)?;
        let excess = archives.len().saturating_sub(keep);
        for old in &archives[..excess] {
            fs::remove_file(old)?;
        }
        Ok(())
    }
}

/// Archived session logs, oldest first. Stamps sort chronologically by name.
fn archived_logs(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut logs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let archived = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(ARCHIVE_PREFIX) && name.ends_with(".log"));
        if archived {
            logs.push(path);
        }
    }
    logs.sort();
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_archives_latest_and_prunes() {
        let root = std::env::temp_dir().join(format!("opsgrid-paths-{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        let paths = AppPaths::under(&root);
        fs::create_dir_all(root.join("logs")).unwrap();
        for day in ["20200101", "20200102", "20200103"] {
            fs::write(root.join("logs").join(format!("session-{}-000000.log", day)), "old").unwrap();
        }
        fs::write(paths.log_file(), "previous run").unwrap();
        fs::write(root.join("logs").join("notes.txt"), "kept").unwrap();

        paths.rotate_logs(2).unwrap();

        let archives = archived_logs(&root.join("logs")).unwrap();
        assert_eq!(archives.len(), 2);
        assert!(archives[0].ends_with("session-20200103-000000.log"));
        assert_eq!(fs::read_to_string(&archives[1]).unwrap(), "previous run");
        assert!(!paths.log_file().exists());
        assert!(root.join("logs").join("notes.txt").exists());
        assert!(paths.layouts_db().starts_with(root.join("data")));

        let _ = fs::remove_dir_all(&root);
    }
}
