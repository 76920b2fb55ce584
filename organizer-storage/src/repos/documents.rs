use super::{opt_text, parse_col, text, DocumentRepository};
use crate::repository::{ProjectScoped, Record};
use organizer_types::{Document, DocumentId, ProjectId};
use rusqlite::params;
use rusqlite::types::Value;
use rusqlite::Row;

impl Record for Document {
    type Id = DocumentId;

    const TABLE: &'static str = "documents";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "project_id",
        "title",
        "file_name",
        "mime_type",
        "byte_size",
        "created_at",
        "updated_at",
    ];
    const ORDER_BY: &'static str = "updated_at DESC, created_at ASC";
    const SEARCH_COLUMNS: &'static [&'static str] = &["title", "file_name"];

    fn id(&self) -> DocumentId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(self.id),
            text(self.project_id),
            text(&self.title),
            text(&self.file_name),
            opt_text(self.mime_type.as_ref()),
            Value::Integer(self.byte_size),
            Value::Integer(self.created_at),
            Value::Integer(self.updated_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Document {
            id: parse_col(row, 0)?,
            project_id: parse_col(row, 1)?,
            title: row.get(2)?,
            file_name: row.get(3)?,
            mime_type: row.get(4)?,
            byte_size: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

impl ProjectScoped for Document {
    fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

impl DocumentRepository {
    /// File names referenced by a project's documents, so the caller can
    /// remove the stored files before a cascade delete drops the rows.
    pub fn file_names_for_project(&self, project_id: &ProjectId) -> Vec<String> {
        self.read_mapped(
            "file_names_for_project",
            "SELECT file_name FROM documents WHERE project_id = ?1 ORDER BY created_at ASC",
            params![project_id.to_string()],
            |row| row.get::<_, String>(0),
        )
    }

    /// Total bytes attached to a project.
    pub fn total_bytes(&self, project_id: &ProjectId) -> i64 {
        self.read_scalar(
            "total_bytes",
            "SELECT COALESCE(SUM(byte_size), 0) FROM documents WHERE project_id = ?1",
            params![project_id.to_string()],
        )
        .unwrap_or(0)
    }
}
