use super::{parse_col, sql_limit, text, NoteRepository};
use crate::repository::{ProjectScoped, Record};
use organizer_types::{Note, NoteId, ProjectId};
use rusqlite::params;
use rusqlite::types::Value;
use rusqlite::Row;

impl Record for Note {
    type Id = NoteId;

    const TABLE: &'static str = "notes";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "project_id",
        "title",
        "body",
        "is_pinned",
        "created_at",
        "updated_at",
    ];
    const ORDER_BY: &'static str = "is_pinned DESC, updated_at DESC, created_at ASC";
    const SEARCH_COLUMNS: &'static [&'static str] = &["title", "body"];

    fn id(&self) -> NoteId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(self.id),
            text(self.project_id),
            text(&self.title),
            text(&self.body),
            Value::from(self.is_pinned),
            Value::Integer(self.created_at),
            Value::Integer(self.updated_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Note {
            id: parse_col(row, 0)?,
            project_id: parse_col(row, 1)?,
            title: row.get(2)?,
            body: row.get(3)?,
            is_pinned: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

impl ProjectScoped for Note {
    fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

impl NoteRepository {
    /// Most recently edited notes of a project, pinned ones first.
    pub fn fetch_recent(&self, project_id: &ProjectId, limit: usize) -> Vec<Note> {
        let sql = format!(
            "SELECT {} FROM notes WHERE project_id = ?1 ORDER BY {} LIMIT ?2",
            Note::COLUMNS.join(", "),
            Note::ORDER_BY
        );
        self.read_rows("fetch_recent", &sql, params![project_id.to_string(), sql_limit(limit)])
    }
}
