//! De-duplicating command history with bounded persistence.
//!
//! The session keeps its own history rather than relying on the line
//! editor's: adding an entry removes every older copy of the same text
//! so a statement appears exactly once, at its most recent position.
//! The backing file is line-oriented (embedded newlines become spaces)
//! and truncated to the most recent entries on save.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Most recent entries kept in the backing store.
const MAX_PERSISTED_ENTRIES: usize = 1000;

/// In-memory history plus its persistent file path.
pub struct History {
    entries: Vec<String>,
    path: Option<PathBuf>,
}

impl History {
    /// Create an unbacked history (used by batch mode and tests).
    pub fn in_memory() -> Self {
        Self {
            entries: Vec::new(),
            path: None,
        }
    }

    /// Load history from `path`, creating an empty store if the file
    /// is absent.
    pub fn load(path: PathBuf) -> io::Result<Self> {
        let entries = match fs::read_to_string(&path) {
            Ok(content) => content
                .lines()
                .filter(|l| !l.is_empty())
                .map(|l| l.to_string())
                .collect(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e),
        };
        Ok(Self {
            entries,
            path: Some(path),
        })
    }

    /// Default history file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sparqlcli").join("sparqlcli.history"))
    }

    /// Append `entry`, superseding any older copy of the same text.
    /// Empty entries are never recorded.
    pub fn add(&mut self, entry: &str) {
        if entry.is_empty() {
            return;
        }
        self.entries.retain(|e| e != entry);
        self.entries.push(entry.to_string());
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Flush to the backing store, bounded to the most recent
    /// [`MAX_PERSISTED_ENTRIES`]. A no-op for in-memory histories.
    pub fn save(&self) -> io::Result<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let start = self.entries.len().saturating_sub(MAX_PERSISTED_ENTRIES);
        let mut out = String::new();
        for entry in &self.entries[start..] {
            out.push_str(&entry.replace('\n', " "));
            out.push('\n');
        }
        fs::write(path, out)
    }
}

/// Test-only constructor to point a history at an explicit file.
#[cfg(test)]
impl History {
    fn with_path(path: &Path) -> Self {
        Self {
            entries: Vec::new(),
            path: Some(path.to_path_buf()),
        }
    }
}
