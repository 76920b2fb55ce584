//! Per-entity table mappings and entity-specific queries.

mod activity_logs;
mod checklists;
mod documents;
mod expenses;
mod ideas;
mod notes;
mod projects;
mod reminders;
mod tags;
mod work_logs;

use crate::database::Database;
use crate::repository::SqliteRepository;
use chrono::NaiveDate;
use organizer_types::{
    ActivityLog, Checklist, ChecklistItem, Document, Expense, ExpenseCategory, Idea, IdeaTagLink,
    Money, Note, Project, Reminder, Tag, WorkLog,
};
use rusqlite::types::{Type, Value};
use rusqlite::Row;
use std::str::FromStr;

pub use activity_logs::DailyCount;

pub type ProjectRepository = SqliteRepository<Project>;
pub type ChecklistRepository = SqliteRepository<Checklist>;
pub type ChecklistItemRepository = SqliteRepository<ChecklistItem>;
pub type IdeaRepository = SqliteRepository<Idea>;
pub type TagRepository = SqliteRepository<Tag>;
pub type IdeaTagLinkRepository = SqliteRepository<IdeaTagLink>;
pub type ExpenseCategoryRepository = SqliteRepository<ExpenseCategory>;
pub type ExpenseRepository = SqliteRepository<Expense>;
pub type NoteRepository = SqliteRepository<Note>;
pub type DocumentRepository = SqliteRepository<Document>;
pub type ReminderRepository = SqliteRepository<Reminder>;
pub type WorkLogRepository = SqliteRepository<WorkLog>;
pub type ActivityLogRepository = SqliteRepository<ActivityLog>;

/// Every entity repository over one shared handle.
#[derive(Clone, Debug)]
pub struct Repositories {
    pub projects: ProjectRepository,
    pub checklists: ChecklistRepository,
    pub checklist_items: ChecklistItemRepository,
    pub ideas: IdeaRepository,
    pub tags: TagRepository,
    pub idea_tags: IdeaTagLinkRepository,
    pub expense_categories: ExpenseCategoryRepository,
    pub expenses: ExpenseRepository,
    pub notes: NoteRepository,
    pub documents: DocumentRepository,
    pub reminders: ReminderRepository,
    pub work_logs: WorkLogRepository,
    pub activity_logs: ActivityLogRepository,
}

impl Repositories {
    pub fn new(db: &Database) -> Self {
        Self {
            projects: SqliteRepository::new(db.clone()),
            checklists: SqliteRepository::new(db.clone()),
            checklist_items: SqliteRepository::new(db.clone()),
            ideas: SqliteRepository::new(db.clone()),
            tags: SqliteRepository::new(db.clone()),
            idea_tags: SqliteRepository::new(db.clone()),
            expense_categories: SqliteRepository::new(db.clone()),
            expenses: SqliteRepository::new(db.clone()),
            notes: SqliteRepository::new(db.clone()),
            documents: SqliteRepository::new(db.clone()),
            reminders: SqliteRepository::new(db.clone()),
            work_logs: SqliteRepository::new(db.clone()),
            activity_logs: SqliteRepository::new(db.clone()),
        }
    }
}

// ── Column helpers ──────────────────────────────────────────────

/// Read a TEXT column through `FromStr` (ids, enums).
pub(crate) fn parse_col<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn parse_opt_col<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        s.parse::<T>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

/// `LIMIT` operand. SQLite reads a negative limit as "no limit", so large
/// values saturate instead of wrapping.
pub(crate) fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

pub(crate) fn text<T: ToString>(value: T) -> Value {
    Value::Text(value.to_string())
}

pub(crate) fn opt_text<T: ToString>(value: Option<T>) -> Value {
    value.map(text).unwrap_or(Value::Null)
}

/// Dates are stored as `YYYY-MM-DD`, the format rusqlite's chrono support reads back.
pub(crate) fn date(value: NaiveDate) -> Value {
    Value::Text(value.format("%Y-%m-%d").to_string())
}

pub(crate) fn opt_date(value: Option<NaiveDate>) -> Value {
    value.map(date).unwrap_or(Value::Null)
}

/// Split an optional amount into its `(minor, currency)` column pair.
pub(crate) fn opt_money(value: Option<&Money>) -> (Value, Value) {
    match value {
        Some(money) => (
            Value::Integer(money.minor_units),
            Value::Text(money.currency.clone()),
        ),
        None => (Value::Null, Value::Null),
    }
}

/// Rebuild an optional amount; a half-filled pair reads as no amount.
pub(crate) fn money_cols(
    row: &Row<'_>,
    minor_idx: usize,
    currency_idx: usize,
) -> rusqlite::Result<Option<Money>> {
    let minor: Option<i64> = row.get(minor_idx)?;
    let currency: Option<String> = row.get(currency_idx)?;
    Ok(match (minor, currency) {
        (Some(minor_units), Some(currency)) => Some(Money {
            minor_units,
            currency,
        }),
        _ => None,
    })
}
