//! Script persistence.
//!
//! The script lives under a fixed key in a string key-value store, encoded
//! as JSON. Loading is best effort: a missing key starts an empty script and
//! an undecodable value is logged and also starts an empty script.
//!
//! [`FileStore`] keeps every key in a single JSON object on disk:
//!
//! ```json
//! { "roteiro_scenes": "[{\"id\":\"…\",\"content\":\"…\",\"dialogues\":[]}]" }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};

use crate::script::Script;

/// Key the script is stored under.
pub const SCRIPT_KEY: &str = "roteiro_scenes";

/// Key the last translated dialogue text is stored under.
pub const TRANSLATION_KEY: &str = "roteiro_translation";

/// String key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Loads the script, falling back to an empty one.
///
/// Read errors and decode failures are logged, never returned.
pub fn load_script(store: &dyn KeyValueStore) -> Script {
    let raw = match store.get(SCRIPT_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Script::default(),
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "failed to read saved script");
            return Script::default();
        }
    };

    match serde_json::from_str::<Script>(&raw) {
        Ok(script) => {
            tracing::debug!(scenes = script.len(), "loaded saved script");
            script
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to decode saved script, starting empty");
            Script::default()
        }
    }
}

/// Encodes the whole script and writes it under [`SCRIPT_KEY`].
pub fn save_script(store: &dyn KeyValueStore, script: &Script) -> Result<()> {
    let json = serde_json::to_string(script).context("encode script")?;
    store.set(SCRIPT_KEY, &json)?;
    tracing::debug!(scenes = script.len(), "saved script");
    Ok(())
}

/// Loads the last translation, empty when absent or unreadable.
pub fn load_translation(store: &dyn KeyValueStore) -> String {
    match store.get(TRANSLATION_KEY) {
        Ok(text) => text.unwrap_or_default(),
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "failed to read saved translation");
            String::new()
        }
    }
}

pub fn save_translation(store: &dyn KeyValueStore, text: &str) -> Result<()> {
    store.set(TRANSLATION_KEY, text)
}

/// Key-value store backed by one JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read store from {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse store at {}", self.path.display()))
    }

    /// Writes the map atomically (temp file in the same directory + rename).
    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;

        let json = serde_json::to_string_pretty(entries).context("encode store")?;
        let mut tmp = tempfile::NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;
        tmp.write_all(json.as_bytes())
            .with_context(|| format!("Failed to write store to {}", tmp.path().display()))?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        // A corrupt file is replaced rather than blocking every save.
        let mut entries = self.read_all().unwrap_or_else(|err| {
            tracing::warn!(error = %format!("{err:#}"), "discarding unreadable store");
            BTreeMap::new()
        });
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|err| anyhow::anyhow!("memory store lock poisoned: {err}"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|err| anyhow::anyhow!("memory store lock poisoned: {err}"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
