//! Key/value user settings.
//!
//! The table is created by migration unit 1, but [`SettingsStore::ensure_table`]
//! can also create it outside the ledger so configuration survives a failed
//! migration run.

use crate::database::Database;
use crate::error::{is_missing_table, StorageResult};
use crate::schema::{DEFAULT_CURRENCY_KEY, SEEDED_DEFAULT_CURRENCY, USER_SETTINGS_DDL};
use organizer_types::now_millis;
use rusqlite::{params, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

#[derive(Clone, Debug)]
pub struct SettingsStore {
    db: Database,
}

impl SettingsStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create `user_settings` if missing. Does not touch the migration ledger.
    pub fn ensure_table(&self) -> StorageResult<()> {
        let conn = self.db.lock_conn();
        conn.execute_batch(USER_SETTINGS_DDL)?;
        Ok(())
    }

    /// Raw value for `key`; `None` when unset or the table does not exist yet.
    pub fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let conn = self.db.lock_conn();
        let result = conn
            .query_row(
                "SELECT value FROM user_settings WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional();
        match result {
            Ok(value) => Ok(value),
            Err(e) if is_missing_table(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert or overwrite `key`.
    pub fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let conn = self.db.lock_conn();
        conn.execute(
            "INSERT INTO user_settings (key, value, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now_millis()],
        )?;
        Ok(())
    }

    /// Write `key` only if it has no value yet. Returns whether a row was written.
    pub fn set_if_absent(&self, key: &str, value: &str) -> StorageResult<bool> {
        let conn = self.db.lock_conn();
        let changed = conn.execute(
            "INSERT INTO user_settings (key, value, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(key) DO NOTHING",
            params![key, value, now_millis()],
        )?;
        Ok(changed > 0)
    }

    pub fn remove(&self, key: &str) -> StorageResult<bool> {
        let conn = self.db.lock_conn();
        let changed = conn.execute("DELETE FROM user_settings WHERE key = ?1", params![key])?;
        Ok(changed > 0)
    }

    /// Typed read of a JSON-encoded setting.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }

    /// Currency for new amounts, falling back to the seeded value when the
    /// setting is missing or unreadable.
    pub fn default_currency(&self) -> String {
        match self.get(DEFAULT_CURRENCY_KEY) {
            Ok(Some(code)) => code,
            Ok(None) => SEEDED_DEFAULT_CURRENCY.to_string(),
            Err(e) => {
                warn!(error = %e, "Failed to read default currency");
                SEEDED_DEFAULT_CURRENCY.to_string()
            }
        }
    }

    pub fn set_default_currency(&self, code: &str) -> StorageResult<()> {
        self.set(DEFAULT_CURRENCY_KEY, code)
    }
}
