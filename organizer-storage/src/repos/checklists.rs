use super::{
    money_cols, opt_date, opt_money, opt_text, parse_col, text, ChecklistItemRepository,
    ChecklistRepository,
};
use crate::repository::{ProjectScoped, Record};
use organizer_types::{
    now_millis, Checklist, ChecklistId, ChecklistItem, ChecklistItemId, Priority, ProjectId,
};
use rusqlite::params;
use rusqlite::types::{Type, Value};
use rusqlite::Row;

impl Record for Checklist {
    type Id = ChecklistId;

    const TABLE: &'static str = "checklists";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "project_id",
        "title",
        "is_pinned",
        "sort_order",
        "created_at",
        "updated_at",
    ];
    const ORDER_BY: &'static str = "is_pinned DESC, sort_order ASC, created_at ASC";
    const SEARCH_COLUMNS: &'static [&'static str] = &["title"];

    fn id(&self) -> ChecklistId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(self.id),
            text(self.project_id),
            text(&self.title),
            Value::from(self.is_pinned),
            Value::Integer(self.sort_order),
            Value::Integer(self.created_at),
            Value::Integer(self.updated_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Checklist {
            id: parse_col(row, 0)?,
            project_id: parse_col(row, 1)?,
            title: row.get(2)?,
            is_pinned: row.get(3)?,
            sort_order: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

impl ProjectScoped for Checklist {
    fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

impl Record for ChecklistItem {
    type Id = ChecklistItemId;

    const TABLE: &'static str = "checklist_items";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "checklist_id",
        "title",
        "notes",
        "is_completed",
        "priority",
        "due_date",
        "cost_minor",
        "cost_currency",
        "sort_order",
        "created_at",
        "updated_at",
    ];
    // Open items first, then by priority.
    const ORDER_BY: &'static str =
        "is_completed ASC, priority DESC, sort_order ASC, created_at ASC";
    const SEARCH_COLUMNS: &'static [&'static str] = &["title", "notes"];

    fn id(&self) -> ChecklistItemId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        let (cost_minor, cost_currency) = opt_money(self.cost_estimate.as_ref());
        vec![
            text(self.id),
            text(self.checklist_id),
            text(&self.title),
            opt_text(self.notes.as_ref()),
            Value::from(self.is_completed),
            Value::Integer(self.priority.as_i64()),
            opt_date(self.due_date),
            cost_minor,
            cost_currency,
            Value::Integer(self.sort_order),
            Value::Integer(self.created_at),
            Value::Integer(self.updated_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let raw_priority: i64 = row.get(5)?;
        let priority = Priority::from_i64(raw_priority)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Integer, Box::new(e)))?;
        Ok(ChecklistItem {
            id: parse_col(row, 0)?,
            checklist_id: parse_col(row, 1)?,
            title: row.get(2)?,
            notes: row.get(3)?,
            is_completed: row.get(4)?,
            priority,
            due_date: row.get(6)?,
            cost_estimate: money_cols(row, 7, 8)?,
            sort_order: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }
}

impl ChecklistItemRepository {
    pub fn fetch_by_checklist_id(&self, checklist_id: &ChecklistId) -> Vec<ChecklistItem> {
        self.fetch_where("fetch_by_checklist_id", "checklist_id", checklist_id.to_string())
    }

    pub fn delete_by_checklist_id(&self, checklist_id: &ChecklistId) -> bool {
        self.delete_where("delete_by_checklist_id", "checklist_id", checklist_id.to_string())
    }

    /// Items of every checklist of `project_id`, by set rather than per
    /// checklist, so rows whose checklist cannot be decoded still go.
    pub fn delete_by_project_id(&self, project_id: &ProjectId) -> bool {
        self.write(
            "delete_by_project_id",
            "DELETE FROM checklist_items \
             WHERE checklist_id IN (SELECT id FROM checklists WHERE project_id = ?1)",
            params![project_id.to_string()],
        )
        .is_some()
    }

    /// Items of every checklist belonging to `project_id`.
    pub fn fetch_by_project_id(&self, project_id: &ProjectId) -> Vec<ChecklistItem> {
        let sql = format!(
            "SELECT {} FROM checklist_items \
             WHERE checklist_id IN (SELECT id FROM checklists WHERE project_id = ?1) \
             ORDER BY {}",
            ChecklistItem::COLUMNS.join(", "),
            ChecklistItem::ORDER_BY
        );
        self.read_rows("fetch_by_project_id", &sql, params![project_id.to_string()])
    }

    pub fn set_completed(&self, id: &ChecklistItemId, completed: bool) -> bool {
        matches!(
            self.write(
                "set_completed",
                "UPDATE checklist_items SET is_completed = ?1, updated_at = ?2 WHERE id = ?3",
                params![completed, now_millis(), id.to_string()],
            ),
            Some(n) if n > 0
        )
    }

    /// `(completed, total)` for one checklist.
    pub fn progress(&self, checklist_id: &ChecklistId) -> (i64, i64) {
        let id = checklist_id.to_string();
        let total = self
            .read_scalar(
                "progress",
                "SELECT COUNT(*) FROM checklist_items WHERE checklist_id = ?1",
                params![id],
            )
            .unwrap_or(0);
        let done = self
            .read_scalar(
                "progress",
                "SELECT COUNT(*) FROM checklist_items WHERE checklist_id = ?1 AND is_completed = 1",
                params![id],
            )
            .unwrap_or(0);
        (done, total)
    }
}

impl ChecklistRepository {
    /// Raw ids of a project's checklists; `None` if they could not be read.
    pub(crate) fn ids_for_project(&self, project_id: &ProjectId) -> Option<Vec<String>> {
        self.fetch_ids_where("ids_for_project", "project_id", project_id.to_string())
    }

    /// Number of checklists in a project.
    pub fn count_by_project_id(&self, project_id: &ProjectId) -> i64 {
        self.read_scalar(
            "count_by_project_id",
            "SELECT COUNT(*) FROM checklists WHERE project_id = ?1",
            params![project_id.to_string()],
        )
        .unwrap_or(0)
    }
}
