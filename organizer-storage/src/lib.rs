//! SQLite persistence layer for the project organizer.
//!
//! One embedded database file is shared by the app and its extension.
//!
//! # Architecture
//!
//! - [`Database`] owns the single connection; repositories clone the handle
//! - [`MigrationRunner`] applies versioned, idempotent schema units and
//!   records each one in the `migrations` ledger
//! - [`SqliteRepository`] implements the [`Repository`] contract for every
//!   entity from its [`Record`] mapping
//! - [`CascadeDeleter`] keeps parent/child rows consistent, since the schema
//!   declares no foreign keys

mod cascade;
mod database;
mod error;
mod migrations;
mod repos;
mod repository;
mod schema;
mod settings;

pub use cascade::{CascadeDeleter, CascadeReport, CascadeStep, StepOutcome};
pub use database::{Database, DATABASE_FILE_NAME};
pub use error::{StorageError, StorageResult};
pub use migrations::{
    current_schema_version, ledger_entries, Migration, MigrationError, MigrationOutcome,
    MigrationRunner, SchemaVersion,
};
pub use repos::{
    ActivityLogRepository, ChecklistItemRepository, ChecklistRepository, DailyCount,
    DocumentRepository, ExpenseCategoryRepository, ExpenseRepository, IdeaRepository,
    IdeaTagLinkRepository, NoteRepository, ProjectRepository, ReminderRepository, Repositories,
    TagRepository, WorkLogRepository,
};
pub use repository::{
    ProjectScoped, ProjectScopedRepository, Record, Repository, SqliteRepository, MIN_SEARCH_LEN,
};
pub use schema::{builtin_migrations, DEFAULT_CURRENCY_KEY, SEEDED_DEFAULT_CURRENCY};
pub use settings::SettingsStore;
