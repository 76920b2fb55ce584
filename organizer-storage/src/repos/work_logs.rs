use super::{date, opt_text, parse_col, parse_opt_col, text, WorkLogRepository};
use crate::repository::{ProjectScoped, Record};
use organizer_types::{ChecklistItemId, ProjectId, WorkLog, WorkLogId};
use rusqlite::params;
use rusqlite::types::Value;
use rusqlite::Row;

impl Record for WorkLog {
    type Id = WorkLogId;

    const TABLE: &'static str = "work_logs";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "project_id",
        "checklist_item_id",
        "summary",
        "minutes",
        "logged_on",
        "created_at",
        "updated_at",
    ];
    const ORDER_BY: &'static str = "logged_on DESC, created_at ASC";
    const SEARCH_COLUMNS: &'static [&'static str] = &["summary"];

    fn id(&self) -> WorkLogId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(self.id),
            text(self.project_id),
            opt_text(self.checklist_item_id),
            text(&self.summary),
            Value::Integer(self.minutes),
            date(self.logged_on),
            Value::Integer(self.created_at),
            Value::Integer(self.updated_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(WorkLog {
            id: parse_col(row, 0)?,
            project_id: parse_col(row, 1)?,
            checklist_item_id: parse_opt_col(row, 2)?,
            summary: row.get(3)?,
            minutes: row.get(4)?,
            logged_on: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

impl ProjectScoped for WorkLog {
    fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

impl WorkLogRepository {
    pub fn fetch_by_checklist_item_id(&self, item_id: &ChecklistItemId) -> Vec<WorkLog> {
        self.fetch_where("fetch_by_checklist_item_id", "checklist_item_id", item_id.to_string())
    }

    /// Minutes logged against a project.
    pub fn total_minutes(&self, project_id: &ProjectId) -> i64 {
        self.read_scalar(
            "total_minutes",
            "SELECT COALESCE(SUM(minutes), 0) FROM work_logs WHERE project_id = ?1",
            params![project_id.to_string()],
        )
        .unwrap_or(0)
    }
}
