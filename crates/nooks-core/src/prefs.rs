//! Last-viewed preference persistence.

use crate::Nook;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

pub trait PreferenceSink: Send + Sync {
    /// Url of the nook that was last viewed, if one was ever recorded.
    fn last_viewed(&self) -> anyhow::Result<Option<String>>;
    fn write_last_viewed(&self, nook: &Nook) -> anyhow::Result<()>;
}

#[derive(Default)]
pub struct MemPrefs {
    inner: RwLock<Option<String>>,
}

impl MemPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_last_viewed<S: Into<String>>(url: S) -> Self {
        Self {
            inner: RwLock::new(Some(url.into())),
        }
    }
}

impl PreferenceSink for MemPrefs {
    fn last_viewed(&self) -> anyhow::Result<Option<String>> {
        Ok(self.inner.read().expect("poisoned").clone())
    }

    fn write_last_viewed(&self, nook: &Nook) -> anyhow::Result<()> {
        *self.inner.write().expect("poisoned") = Some(nook.url.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PrefsFile {
    last_viewed: Option<String>,
}

/// File-backed preferences: a small TOML document at a caller-chosen path.
/// A missing or unparseable file reads as "no preference".
pub struct TomlPrefs {
    path: PathBuf,
}

impl TomlPrefs {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load(&self) -> PrefsFile {
        if let Ok(s) = std::fs::read_to_string(&self.path) {
            toml::from_str(&s).unwrap_or_default()
        } else {
            PrefsFile::default()
        }
    }
}

impl PreferenceSink for TomlPrefs {
    fn last_viewed(&self) -> anyhow::Result<Option<String>> {
        Ok(self.load().last_viewed)
    }

    fn write_last_viewed(&self, nook: &Nook) -> anyhow::Result<()> {
        let mut file = self.load();
        file.last_viewed = Some(nook.url.clone());
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, toml::to_string(&file)?)?;
        Ok(())
    }
}
