//! File-based data source.
//!
//! Polls a dashboard JSON file written by `gaugewatch export`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use gaugewatch_types::Dashboard;

use super::DataSource;

/// Reads an exported dashboard from a JSON file.
///
/// A dashboard is handed out on the first poll, whenever the file's mtime
/// moves forward, and once after each [`DataSource::refresh`].
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    /// Mtime of the last dashboard handed out.
    seen: Option<SystemTime>,
    reread: bool,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            description: format!("file: {}", path.display()),
            path,
            last_error: None,
            seen: None,
            reread: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mtime(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }

    fn load(&self) -> Result<Dashboard, String> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| format!("Read error: {}", e))?;
        serde_json::from_str(&content).map_err(|e| format!("Parse error: {}", e))
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<Dashboard> {
        let mtime = self.mtime();
        let updated = match self.seen {
            None => true,
            // A vanished file keeps the dashboard already shown
            Some(seen) => mtime.is_some_and(|m| m > seen),
        };

        let reread = std::mem::take(&mut self.reread);
        if !updated && !reread {
            return None;
        }

        match self.load() {
            Ok(dashboard) => {
                self.last_error = None;
                self.seen = mtime;
                Some(dashboard)
            }
            Err(e) => {
                self.last_error = Some(e);
                None
            }
        }
    }

    fn refresh(&mut self) {
        self.reread = true;
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
