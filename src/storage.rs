//! Local key-value persistence for scores and preferences.
//!
//! Values are strings, like browser local storage. Typed reads fall back to
//! defaults when a key is absent or unparseable; failed writes are logged and
//! otherwise ignored.

use directories::ProjectDirs;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub mod keys {
    pub const ACHIEVEMENTS: &str = "achievements";
    pub const BEST_STREAK: &str = "best_streak";
    pub const MUTED: &str = "muted";
    pub const BIRD: &str = "bird";

    /// High scores are kept per theme mode.
    pub fn high_score(mode: &str) -> String {
        format!("high_score.{mode}")
    }
}

pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

// ── Typed access ────────────────────────────────────────────────────────────

pub fn read_or<T: FromStr>(store: &dyn Storage, key: &str, default: T) -> T {
    store
        .get(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

pub fn read_json_or_default<T: Default + DeserializeOwned>(store: &dyn Storage, key: &str) -> T {
    store
        .get(key)
        .and_then(|v| serde_json::from_str(&v).ok())
        .unwrap_or_default()
}

/// Writes `value` under `key`. Returns whether it stuck.
pub fn write(store: &mut dyn Storage, key: &str, value: impl ToString) -> bool {
    match store.set(key, &value.to_string()) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(key, "failed to persist: {e}");
            false
        }
    }
}

pub fn write_json<T: Serialize>(store: &mut dyn Storage, key: &str, value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(json) => write(store, key, json),
        Err(e) => {
            tracing::warn!(key, "failed to encode: {e}");
            false
        }
    }
}

// ── Stores ──────────────────────────────────────────────────────────────────

/// In-memory store for `--ephemeral` runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            read_only: false,
        }
    }

    /// A store whose writes always fail, like a full or locked disk.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

impl Storage for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        if self.read_only {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "store is read-only"));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One pretty-printed JSON object on disk, rewritten on every `set`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens `save.json` in the platform data directory.
    pub fn open_default() -> io::Result<Self> {
        Self::open(data_dir()?.join("save.json"))
    }

    /// Opens or creates the store at `path`. A missing or corrupt file starts
    /// out empty.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let values = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), "ignoring unreadable save file: {e}");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&self.values)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, json)
    }
}

impl Storage for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

/// Platform data directory for saves and logs, created if needed.
pub fn data_dir() -> io::Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "keybird").ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "could not determine data directory")
    })?;
    let dir = dirs.data_dir().to_path_buf();
    fs::create_dir_all(&dir)?;
    Ok(dir)
}
