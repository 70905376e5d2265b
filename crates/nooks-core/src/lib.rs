//! nooks-core: domain types, storage traits, preferences, and selection state

use serde::{Deserialize, Serialize};
use std::sync::RwLock;

pub mod prefs;
pub mod selection;

pub use prefs::{MemPrefs, PreferenceSink, TomlPrefs};
pub use selection::{SelectionController, Snapshot};

pub type NookId = String;

/// A named entry in the managed collection. Identity is `id`; `url` is an
/// opaque stable reference minted at creation and never rewritten by
/// rename or update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Nook {
    pub id: NookId,
    pub name: String,
    pub url: String,
}

impl Nook {
    pub fn new<S: Into<String>>(id: NookId, name: S) -> Self {
        let url = format!("nook://{id}");
        Self {
            id,
            name: name.into(),
            url,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no nook with id {0}")]
    NotFound(NookId),
}

pub trait NookStore: Send + Sync {
    /// Every nook the store holds, in no particular order.
    fn fetch_all(&self) -> anyhow::Result<Vec<Nook>>;
    fn create(&self, name: &str) -> anyhow::Result<Nook>;
    /// Fails with [`StoreError::NotFound`] when the id is absent.
    fn delete(&self, nook: &Nook) -> anyhow::Result<()>;
    fn rename(&self, nook: &Nook, new_name: &str) -> anyhow::Result<Nook>;
    fn update(&self, nook: &Nook) -> anyhow::Result<Nook>;
}

/// In-memory store; the injectable stand-in for tests and embedding.
#[derive(Default)]
pub struct MemStore {
    inner: RwLock<Vec<Nook>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
        }
    }

    pub fn with_nooks(nooks: Vec<Nook>) -> Self {
        Self {
            inner: RwLock::new(nooks),
        }
    }
}

fn gen_id() -> NookId {
    uuid::Uuid::new_v4().to_string()
}

impl NookStore for MemStore {
    fn fetch_all(&self) -> anyhow::Result<Vec<Nook>> {
        let v = self.inner.read().expect("poisoned");
        Ok(v.clone())
    }

    fn create(&self, name: &str) -> anyhow::Result<Nook> {
        let nook = Nook::new(gen_id(), name);
        let mut v = self.inner.write().expect("poisoned");
        v.push(nook.clone());
        Ok(nook)
    }

    fn delete(&self, nook: &Nook) -> anyhow::Result<()> {
        let mut v = self.inner.write().expect("poisoned");
        let before = v.len();
        v.retain(|n| n.id != nook.id);
        if v.len() == before {
            return Err(StoreError::NotFound(nook.id.clone()).into());
        }
        Ok(())
    }

    fn rename(&self, nook: &Nook, new_name: &str) -> anyhow::Result<Nook> {
        let mut v = self.inner.write().expect("poisoned");
        match v.iter_mut().find(|n| n.id == nook.id) {
            Some(n) => {
                n.name = new_name.to_string();
                Ok(n.clone())
            }
            None => Err(StoreError::NotFound(nook.id.clone()).into()),
        }
    }

    fn update(&self, nook: &Nook) -> anyhow::Result<Nook> {
        let mut v = self.inner.write().expect("poisoned");
        match v.iter_mut().find(|n| n.id == nook.id) {
            Some(n) => {
                *n = nook.clone();
                Ok(n.clone())
            }
            None => Err(StoreError::NotFound(nook.id.clone()).into()),
        }
    }
}

#[cfg(feature = "sqlite")]
mod sqlite_store {
    use super::*;
    use rusqlite::{params, Connection};
    use std::path::Path;
    use std::sync::Mutex;

    const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS nooks (
        id   TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        url  TEXT NOT NULL UNIQUE
    )";

    pub struct SqliteStore {
        conn: Mutex<Connection>,
    }

    impl SqliteStore {
        pub fn new<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
            let conn = Connection::open(path.as_ref())?;
            conn.pragma_update(None, "foreign_keys", 1)?;
            let _ = conn.pragma_update(None, "journal_mode", "WAL");
            let _ = conn.busy_timeout(std::time::Duration::from_millis(5000));
            conn.execute(SCHEMA, [])?;
            Ok(Self {
                conn: Mutex::new(conn),
            })
        }
    }

    impl NookStore for SqliteStore {
        fn fetch_all(&self) -> anyhow::Result<Vec<Nook>> {
            let conn = self.conn.lock().unwrap();
            let mut stmt = conn.prepare("SELECT id, name, url FROM nooks")?;
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                out.push(Nook {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    url: row.get(2)?,
                });
            }
            Ok(out)
        }

        fn create(&self, name: &str) -> anyhow::Result<Nook> {
            let nook = Nook::new(super::gen_id(), name);
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO nooks(id, name, url) VALUES(?, ?, ?)",
                params![nook.id, nook.name, nook.url],
            )?;
            Ok(nook)
        }

        fn delete(&self, nook: &Nook) -> anyhow::Result<()> {
            let conn = self.conn.lock().unwrap();
            let changed = conn.execute("DELETE FROM nooks WHERE id = ?", params![nook.id])?;
            if changed == 0 {
                return Err(StoreError::NotFound(nook.id.clone()).into());
            }
            Ok(())
        }

        fn rename(&self, nook: &Nook, new_name: &str) -> anyhow::Result<Nook> {
            let conn = self.conn.lock().unwrap();
            let changed = conn.execute(
                "UPDATE nooks SET name = ? WHERE id = ?",
                params![new_name, nook.id],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(nook.id.clone()).into());
            }
            Ok(Nook {
                id: nook.id.clone(),
                name: new_name.to_string(),
                url: nook.url.clone(),
            })
        }

        fn update(&self, nook: &Nook) -> anyhow::Result<Nook> {
            let conn = self.conn.lock().unwrap();
            let changed = conn.execute(
                "UPDATE nooks SET name = ?, url = ? WHERE id = ?",
                params![nook.name, nook.url, nook.id],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(nook.id.clone()).into());
            }
            Ok(nook.clone())
        }
    }

    // Re-export
    pub use SqliteStore as StoreImpl;
}

#[cfg(not(feature = "sqlite"))]
mod sqlite_store {
    pub use super::MemStore as StoreImpl;
}

#[cfg(feature = "sqlite")]
pub use sqlite_store::SqliteStore;
pub use sqlite_store::StoreImpl;
