//! DDL for the built-in migration units.
//!
//! Every statement is `IF NOT EXISTS` so a unit that died halfway through a
//! previous launch can simply run again. No table declares a foreign key.

use crate::migrations::Migration;
use organizer_types::now_millis;
use rusqlite::{params, Connection};

/// Settings key holding the ISO-4217 code used for new amounts.
pub const DEFAULT_CURRENCY_KEY: &str = "default_currency";

/// Value seeded by the first unit.
pub const SEEDED_DEFAULT_CURRENCY: &str = "USD";

/// Append-only ledger, one row per applied unit.
pub(crate) const MIGRATIONS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS migrations (
    sequence INTEGER PRIMARY KEY AUTOINCREMENT,
    applied_at INTEGER NOT NULL
);
"#;

pub(crate) const USER_SETTINGS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS user_settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);
"#;

const PROJECTS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    status TEXT NOT NULL DEFAULT 'active',
    start_date TEXT,
    end_date TEXT,
    budget_minor INTEGER,
    budget_currency TEXT,
    is_pinned INTEGER NOT NULL DEFAULT 0,
    sort_order INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_projects_status ON projects(status);
"#;

const CHECKLISTS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS checklists (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL,
    title TEXT NOT NULL,
    is_pinned INTEGER NOT NULL DEFAULT 0,
    sort_order INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_checklists_project ON checklists(project_id);

CREATE TABLE IF NOT EXISTS checklist_items (
    id TEXT PRIMARY KEY,
    checklist_id TEXT NOT NULL,
    title TEXT NOT NULL,
    notes TEXT,
    is_completed INTEGER NOT NULL DEFAULT 0,
    priority INTEGER NOT NULL DEFAULT 1,
    due_date TEXT,
    cost_minor INTEGER,
    cost_currency TEXT,
    sort_order INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_checklist_items_checklist ON checklist_items(checklist_id);
"#;

const IDEAS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS ideas (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL,
    title TEXT NOT NULL,
    notes TEXT,
    is_pinned INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_ideas_project ON ideas(project_id);

CREATE TABLE IF NOT EXISTS tags (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    color TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS idea_tags (
    id TEXT PRIMARY KEY,
    idea_id TEXT NOT NULL,
    tag_id TEXT NOT NULL,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_idea_tags_idea ON idea_tags(idea_id);
CREATE INDEX IF NOT EXISTS idx_idea_tags_tag ON idea_tags(tag_id);
"#;

const NOTES_DOCUMENTS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS notes (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL,
    title TEXT NOT NULL,
    body TEXT NOT NULL DEFAULT '',
    is_pinned INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_notes_project ON notes(project_id);

CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL,
    title TEXT NOT NULL,
    file_name TEXT NOT NULL,
    mime_type TEXT,
    byte_size INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_documents_project ON documents(project_id);
"#;

const EXPENSES_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS expense_categories (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL,
    name TEXT NOT NULL,
    color TEXT,
    sort_order INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_expense_categories_project ON expense_categories(project_id);

CREATE TABLE IF NOT EXISTS expenses (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL,
    category_id TEXT,
    checklist_item_id TEXT,
    title TEXT NOT NULL,
    vendor TEXT,
    notes TEXT,
    amount_minor INTEGER NOT NULL,
    currency TEXT NOT NULL,
    spent_on TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_expenses_project ON expenses(project_id);
CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category_id);
"#;

const REMINDERS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS reminders (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL,
    title TEXT NOT NULL,
    notes TEXT,
    remind_at INTEGER NOT NULL,
    is_completed INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_reminders_project ON reminders(project_id);
CREATE INDEX IF NOT EXISTS idx_reminders_remind_at ON reminders(remind_at);
"#;

const LOGS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS work_logs (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL,
    checklist_item_id TEXT,
    summary TEXT NOT NULL,
    minutes INTEGER NOT NULL DEFAULT 0,
    logged_on TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_work_logs_project ON work_logs(project_id);

CREATE TABLE IF NOT EXISTS activity_logs (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL,
    kind TEXT NOT NULL,
    detail TEXT,
    occurred_at INTEGER NOT NULL,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_activity_logs_project ON activity_logs(project_id);
CREATE INDEX IF NOT EXISTS idx_activity_logs_project_time ON activity_logs(project_id, occurred_at);
"#;

/// The built-in units, in application order.
pub fn builtin_migrations() -> Vec<Migration> {
    vec![
        Migration {
            version: 1,
            description: "ledger, user settings, default currency",
            up: bootstrap_ledger_and_settings,
        },
        Migration {
            version: 2,
            description: "projects and checklists",
            up: |conn| {
                conn.execute_batch(PROJECTS_DDL)?;
                conn.execute_batch(CHECKLISTS_DDL)
            },
        },
        Migration {
            version: 3,
            description: "ideas, tags, notes, documents",
            up: |conn| {
                conn.execute_batch(IDEAS_DDL)?;
                conn.execute_batch(NOTES_DOCUMENTS_DDL)
            },
        },
        Migration {
            version: 4,
            description: "expenses and reminders",
            up: |conn| {
                conn.execute_batch(EXPENSES_DDL)?;
                conn.execute_batch(REMINDERS_DDL)
            },
        },
        Migration {
            version: 5,
            description: "work logs and activity logs",
            up: |conn| conn.execute_batch(LOGS_DDL),
        },
    ]
}

/// Unit 1. The seed only fills the currency when absent, so a rerun after a
/// partial failure never clobbers a value the user has changed since.
fn bootstrap_ledger_and_settings(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(MIGRATIONS_DDL)?;
    conn.execute_batch(USER_SETTINGS_DDL)?;
    conn.execute(
        "INSERT INTO user_settings (key, value, updated_at) VALUES (?1, ?2, ?3) \
         ON CONFLICT(key) DO NOTHING",
        params![DEFAULT_CURRENCY_KEY, SEEDED_DEFAULT_CURRENCY, now_millis()],
    )?;
    Ok(())
}
