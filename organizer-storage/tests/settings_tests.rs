//! Tests for the key/value settings store.

use organizer_storage::{
    Database, MigrationRunner, SettingsStore, DEFAULT_CURRENCY_KEY, SEEDED_DEFAULT_CURRENCY,
};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};

fn migrated_store() -> SettingsStore {
    let db = Database::open_in_memory().unwrap();
    MigrationRunner::builtin().migrate_to_latest(&db).unwrap();
    SettingsStore::new(db)
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Layout {
    sidebar_width: u32,
    collapsed: Vec<String>,
}

// ── Raw values ───────────────────────────────────────────────────

#[test]
fn set_get_and_overwrite() {
    let store = migrated_store();
    assert_eq!(store.get("theme").unwrap(), None);

    store.set("theme", "dark").unwrap();
    assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));

    store.set("theme", "light").unwrap();
    assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));
}

#[test]
fn remove_reports_whether_key_existed() {
    let store = migrated_store();
    store.set("k", "v").unwrap();
    assert!(store.remove("k").unwrap());
    assert!(!store.remove("k").unwrap());
    assert_eq!(store.get("k").unwrap(), None);
}

#[test]
fn set_if_absent_keeps_existing_value() {
    let store = migrated_store();
    assert!(store.set_if_absent("week_start", "monday").unwrap());
    assert!(!store.set_if_absent("week_start", "sunday").unwrap());
    assert_eq!(store.get("week_start").unwrap().as_deref(), Some("monday"));
}

// ── JSON values ──────────────────────────────────────────────────

#[test]
fn json_values_roundtrip() {
    let store = migrated_store();
    let layout = Layout {
        sidebar_width: 240,
        collapsed: vec!["ideas".into()],
    };
    store.set_json("layout", &layout).unwrap();
    assert_eq!(store.get_json::<Layout>("layout").unwrap(), Some(layout));
    assert_eq!(store.get_json::<Layout>("missing").unwrap(), None);
}

#[test]
fn malformed_json_is_an_error() {
    let store = migrated_store();
    store.set("layout", "{not json").unwrap();
    assert!(store.get_json::<Layout>("layout").is_err());
}

// ── Default currency ─────────────────────────────────────────────

#[test]
fn default_currency_is_seeded_by_migrations() {
    let store = migrated_store();
    assert_eq!(
        store.get(DEFAULT_CURRENCY_KEY).unwrap().as_deref(),
        Some(SEEDED_DEFAULT_CURRENCY)
    );
    store.set_default_currency("JPY").unwrap();
    assert_eq!(store.default_currency(), "JPY");
}

#[test]
fn default_currency_falls_back_without_table() {
    let store = SettingsStore::new(Database::open_in_memory().unwrap());
    assert_eq!(store.get("anything").unwrap(), None);
    assert_eq!(store.default_currency(), SEEDED_DEFAULT_CURRENCY);
}

#[test]
fn ensure_table_works_without_migrations() {
    let db = Database::open_in_memory().unwrap();
    let store = SettingsStore::new(db.clone());
    store.ensure_table().unwrap();
    store.ensure_table().unwrap();
    store.set("k", "v").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    // The ledger is untouched, so a later migration run still starts at zero.
    assert_eq!(organizer_storage::current_schema_version(&db), 0);
}
