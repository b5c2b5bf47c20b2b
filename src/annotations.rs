//! Local aliases and tags for monitors.
//!
//! Annotations live in two JSON files inside the storage directory:
//!
//! ```text
//! .gaugewatch/
//! ├── aliases.json   {"<monitor id>": "alias", ...}
//! └── tags.json      {"<monitor id>": ["tag", ...], ...}
//! ```
//!
//! They are keyed by monitor id and never sent to the backend. Entries for
//! monitors that no longer exist are kept and simply never matched. Every
//! write is a read-modify-write of the whole file.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

const ALIASES_FILE: &str = "aliases.json";
const TAGS_FILE: &str = "tags.json";

/// Errors from reading or writing the annotation files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed annotation file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// A snapshot of every alias and tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    pub aliases: BTreeMap<String, String>,
    pub tags: BTreeMap<String, Vec<String>>,
}

impl Annotations {
    pub fn alias(&self, id: &str) -> Option<&str> {
        self.aliases.get(id).map(String::as_str)
    }

    pub fn tags(&self, id: &str) -> &[String] {
        self.tags.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// File-backed annotation store.
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    dir: PathBuf,
}

impl AnnotationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load every annotation. Missing files read as empty.
    pub fn load(&self) -> Result<Annotations, StoreError> {
        Ok(Annotations {
            aliases: self.read(ALIASES_FILE)?,
            tags: self.read(TAGS_FILE)?,
        })
    }

    /// Set or remove (`None` or blank) the alias of a monitor.
    pub fn set_alias(&self, id: &str, alias: Option<&str>) -> Result<(), StoreError> {
        let mut aliases: BTreeMap<String, String> = self.read(ALIASES_FILE)?;
        match alias.map(str::trim).filter(|a| !a.is_empty()) {
            Some(alias) => {
                aliases.insert(id.to_string(), alias.to_string());
            }
            None => {
                aliases.remove(id);
            }
        }
        self.write(ALIASES_FILE, &aliases)
    }

    /// Add a tag to a monitor. Adding an existing tag is a no-op.
    pub fn add_tag(&self, id: &str, tag: &str) -> Result<(), StoreError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(StoreError::Empty("Tag"));
        }
        let mut tags: BTreeMap<String, Vec<String>> = self.read(TAGS_FILE)?;
        let entry = tags.entry(id.to_string()).or_default();
        if !entry.iter().any(|t| t == tag) {
            entry.push(tag.to_string());
        }
        self.write(TAGS_FILE, &tags)
    }

    /// Remove one tag from a monitor. Returns whether it was present.
    pub fn remove_tag(&self, id: &str, tag: &str) -> Result<bool, StoreError> {
        let mut tags: BTreeMap<String, Vec<String>> = self.read(TAGS_FILE)?;
        let Some(entry) = tags.get_mut(id) else {
            return Ok(false);
        };
        let before = entry.len();
        entry.retain(|t| t != tag.trim());
        let removed = entry.len() != before;
        if entry.is_empty() {
            tags.remove(id);
        }
        if removed {
            self.write(TAGS_FILE, &tags)?;
        }
        Ok(removed)
    }

    /// Remove every tag from a monitor.
    pub fn clear_tags(&self, id: &str) -> Result<(), StoreError> {
        let mut tags: BTreeMap<String, Vec<String>> = self.read(TAGS_FILE)?;
        if tags.remove(id).is_some() {
            self.write(TAGS_FILE, &tags)?;
        }
        Ok(())
    }

    fn read<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T, StoreError> {
        let path = self.dir.join(name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        if content.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&content).map_err(|source| StoreError::Json { path, source })
    }

    fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(value)
            .map_err(|source| StoreError::Json { path: path.clone(), source })?;
        fs::write(&path, json).map_err(|source| StoreError::Io { path: path.clone(), source })?;
        debug!(path = %path.display(), "Saved annotations");
        Ok(())
    }
}
