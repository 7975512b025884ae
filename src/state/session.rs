use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::error::SessionError;

/// Blob keys, one per store
pub const SIGN_TYPES_KEY: &str = "signTypes";
pub const SIGNS_KEY: &str = "signs";
pub const LAYERS_KEY: &str = "tifLayers";

/// Session-scoped key/value storage for serialized store collections.
/// Values are whole JSON documents, overwritten on every write.
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError>;
}

/// Blob store backed by a SQLite file.
pub struct SqliteSession {
    conn: Connection,
    db_path: PathBuf,
}

impl SqliteSession {
    /// Open (or create) the session database at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self, SessionError> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SessionError::Unavailable(e.to_string()))?;
        }

        let conn = Connection::open(db_path)?;
        let session = Self { conn, db_path: db_path.to_path_buf() };
        session.init_schema()?;

        tracing::info!(path = %db_path.display(), "session store opened");
        Ok(session)
    }

    /// Initialize the schema if it doesn't exist
    fn init_schema(&self) -> Result<(), SessionError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS session_blobs (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL,
                updated_at      INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }
}

impl BlobStore for SqliteSession {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM session_blobs WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.conn.execute(
            "INSERT INTO session_blobs (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value, Utc::now().timestamp()],
        )?;
        Ok(())
    }
}

impl std::fmt::Debug for SqliteSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteSession")
            .field("db_path", &self.db_path)
            .finish()
    }
}

/// Blob store that lives only as long as the process
#[derive(Debug, Default, Clone)]
pub struct MemorySession {
    blobs: HashMap<String, String>,
}

impl BlobStore for MemorySession {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read a collection from the session, falling back to `seed`.
///
/// A missing key, a read error and malformed JSON are all treated as a
/// cache miss.
pub fn load_or_seed<T, F>(store: &dyn BlobStore, key: &str, seed: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(key, "no session blob, using seed data");
            return seed();
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "session read failed, using seed data");
            return seed();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "session blob is malformed, using seed data");
            seed()
        }
    }
}

/// Write a collection to the session. Failures are logged and swallowed;
/// in-memory state stays authoritative.
pub fn save<T: Serialize + ?Sized>(store: &mut dyn BlobStore, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(SessionError::from)
        .and_then(|json| store.set(key, &json));

    if let Err(e) = result {
        tracing::warn!(key, error = %e, "session write failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_session_overwrites() {
        let mut session = MemorySession::default();
        assert_eq!(session.get("signs").unwrap(), None);

        session.set("signs", "[1]").unwrap();
        session.set("signs", "[2]").unwrap();
        assert_eq!(session.get("signs").unwrap().as_deref(), Some("[2]"));
    }

    #[test]
    fn test_sqlite_session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.db");

        {
            let mut session = SqliteSession::open(&path).unwrap();
            session.set(SIGNS_KEY, "[]").unwrap();
            session.set(SIGNS_KEY, "[{\"id\":1}]").unwrap();
        }

        let session = SqliteSession::open(&path).unwrap();
        assert_eq!(session.path(), path.as_path());
        assert_eq!(session.get(SIGNS_KEY).unwrap().as_deref(), Some("[{\"id\":1}]"));
        assert_eq!(session.get(LAYERS_KEY).unwrap(), None);
    }

    #[test]
    fn test_load_falls_back_on_missing_and_malformed() {
        let mut session = MemorySession::default();
        let seeded: Vec<u32> = load_or_seed(&session, SIGNS_KEY, || vec![1, 2]);
        assert_eq!(seeded, vec![1, 2]);

        session.set(SIGNS_KEY, "{not json").unwrap();
        let seeded: Vec<u32> = load_or_seed(&session, SIGNS_KEY, || vec![3]);
        assert_eq!(seeded, vec![3]);

        session.set(SIGNS_KEY, "[7,8]").unwrap();
        let loaded: Vec<u32> = load_or_seed(&session, SIGNS_KEY, Vec::new);
        assert_eq!(loaded, vec![7, 8]);
    }

    #[test]
    fn test_save_round_trips() {
        let mut session = MemorySession::default();
        save(&mut session, SIGN_TYPES_KEY, &vec!["a", "b"]);
        let loaded: Vec<String> = load_or_seed(&session, SIGN_TYPES_KEY, Vec::new);
        assert_eq!(loaded, vec!["a", "b"]);
    }
}
