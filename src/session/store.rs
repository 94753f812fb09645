// Durable credential storage backed by a SQLite key-value table

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension};

use super::types::Credentials;
use crate::error::Result;
use crate::models::User;

const KEY_ACCESS_TOKEN: &str = "access_token";
const KEY_REFRESH_TOKEN: &str = "refresh_token";
const KEY_USER: &str = "user";

/// Key-value store persisting the session across process restarts.
///
/// One row per key; the admin surface shares the same `access_token` key
/// as every other service (a separate `token` key would be a latent bug).
pub struct CredentialStore {
    conn: Mutex<Connection>,
}

impl CredentialStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(anyhow::Error::from)?;
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// In-memory store for tests.
    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS session_kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().expect("credential store lock poisoned");
        let value = conn
            .query_row(
                "SELECT value FROM session_kv WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().expect("credential store lock poisoned");
        conn.execute(
            "INSERT OR REPLACE INTO session_kv (key, value) VALUES (?, ?)",
            [key, value],
        )?;
        Ok(())
    }

    /// Load the persisted token pair, if a complete one exists.
    pub fn load(&self) -> Result<Option<Credentials>> {
        let access_token = self.get(KEY_ACCESS_TOKEN)?;
        let refresh_token = self.get(KEY_REFRESH_TOKEN)?;
        Ok(match (access_token, refresh_token) {
            (Some(access_token), Some(refresh_token)) => Some(Credentials {
                access_token,
                refresh_token,
            }),
            _ => None,
        })
    }

    /// Persist the token pair.
    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        self.set(KEY_ACCESS_TOKEN, &credentials.access_token)?;
        self.set(KEY_REFRESH_TOKEN, &credentials.refresh_token)?;
        Ok(())
    }

    /// Replace only the access token (single-refresh-token model).
    pub fn save_access_token(&self, access_token: &str) -> Result<()> {
        self.set(KEY_ACCESS_TOKEN, access_token)
    }

    /// Cache the authenticated user record alongside the tokens.
    pub fn save_user(&self, user: &User) -> Result<()> {
        let json = serde_json::to_string(user).map_err(anyhow::Error::from)?;
        self.set(KEY_USER, &json)
    }

    pub fn load_user(&self) -> Result<Option<User>> {
        match self.get(KEY_USER)? {
            Some(json) => Ok(serde_json::from_str(&json).ok()),
            None => Ok(None),
        }
    }

    /// Remove tokens and the cached user.
    pub fn clear(&self) -> Result<()> {
        let conn = self.conn.lock().expect("credential store lock poisoned");
        conn.execute(
            "DELETE FROM session_kv WHERE key IN (?, ?, ?)",
            [KEY_ACCESS_TOKEN, KEY_REFRESH_TOKEN, KEY_USER],
        )?;
        Ok(())
    }
}
