use super::{opt_text, parse_col, sql_limit, text, ReminderRepository};
use crate::repository::{ProjectScoped, Record};
use organizer_types::{now_millis, ProjectId, Reminder, ReminderId};
use rusqlite::params;
use rusqlite::types::Value;
use rusqlite::Row;

impl Record for Reminder {
    type Id = ReminderId;

    const TABLE: &'static str = "reminders";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "project_id",
        "title",
        "notes",
        "remind_at",
        "is_completed",
        "created_at",
        "updated_at",
    ];
    // Open reminders first, soonest first.
    const ORDER_BY: &'static str = "is_completed ASC, remind_at ASC, created_at ASC";
    const SEARCH_COLUMNS: &'static [&'static str] = &["title", "notes"];

    fn id(&self) -> ReminderId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(self.id),
            text(self.project_id),
            text(&self.title),
            opt_text(self.notes.as_ref()),
            Value::Integer(self.remind_at),
            Value::from(self.is_completed),
            Value::Integer(self.created_at),
            Value::Integer(self.updated_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Reminder {
            id: parse_col(row, 0)?,
            project_id: parse_col(row, 1)?,
            title: row.get(2)?,
            notes: row.get(3)?,
            remind_at: row.get(4)?,
            is_completed: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

impl ProjectScoped for Reminder {
    fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

impl ReminderRepository {
    /// Open reminders due at or after `now`, across all projects.
    pub fn fetch_upcoming(&self, now: i64, limit: usize) -> Vec<Reminder> {
        let sql = format!(
            "SELECT {} FROM reminders WHERE is_completed = 0 AND remind_at >= ?1 \
             ORDER BY remind_at ASC, created_at ASC LIMIT ?2",
            Reminder::COLUMNS.join(", ")
        );
        self.read_rows("fetch_upcoming", &sql, params![now, sql_limit(limit)])
    }

    pub fn set_completed(&self, id: &ReminderId, completed: bool) -> bool {
        matches!(
            self.write(
                "set_completed",
                "UPDATE reminders SET is_completed = ?1, updated_at = ?2 WHERE id = ?3",
                params![completed, now_millis(), id.to_string()],
            ),
            Some(n) if n > 0
        )
    }
}
