use super::{money_cols, opt_date, opt_money, opt_text, parse_col, text, ProjectRepository};
use crate::repository::Record;
use organizer_types::{Project, ProjectId, ProjectStatus};
use rusqlite::params;
use rusqlite::types::Value;
use rusqlite::Row;

impl Record for Project {
    type Id = ProjectId;

    const TABLE: &'static str = "projects";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "description",
        "status",
        "start_date",
        "end_date",
        "budget_minor",
        "budget_currency",
        "is_pinned",
        "sort_order",
        "created_at",
        "updated_at",
    ];
    const ORDER_BY: &'static str = "is_pinned DESC, sort_order ASC, created_at ASC";
    const SEARCH_COLUMNS: &'static [&'static str] = &["name", "description"];

    fn id(&self) -> ProjectId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        let (budget_minor, budget_currency) = opt_money(self.budget.as_ref());
        vec![
            text(self.id),
            text(&self.name),
            opt_text(self.description.as_ref()),
            text(self.status.as_str()),
            opt_date(self.start_date),
            opt_date(self.end_date),
            budget_minor,
            budget_currency,
            Value::from(self.is_pinned),
            Value::Integer(self.sort_order),
            Value::Integer(self.created_at),
            Value::Integer(self.updated_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Project {
            id: parse_col(row, 0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            status: parse_col(row, 3)?,
            start_date: row.get(4)?,
            end_date: row.get(5)?,
            budget: money_cols(row, 6, 7)?,
            is_pinned: row.get(8)?,
            sort_order: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }
}

impl ProjectRepository {
    /// Projects in one lifecycle state, in designated order.
    pub fn fetch_by_status(&self, status: ProjectStatus) -> Vec<Project> {
        self.fetch_where("fetch_by_status", "status", status.as_str().to_string())
    }

    /// Flip the pin flag without rewriting the rest of the row.
    pub fn set_pinned(&self, id: &ProjectId, pinned: bool) -> bool {
        let sql = "UPDATE projects SET is_pinned = ?1, updated_at = ?2 WHERE id = ?3";
        matches!(
            self.write(
                "set_pinned",
                sql,
                params![pinned, organizer_types::now_millis(), id.to_string()]
            ),
            Some(n) if n > 0
        )
    }
}

