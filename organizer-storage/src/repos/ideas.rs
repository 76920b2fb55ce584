use super::{opt_text, parse_col, text, IdeaRepository};
use crate::repository::{ProjectScoped, Record};
use organizer_types::{Idea, IdeaId, ProjectId, TagId};
use rusqlite::params;
use rusqlite::types::Value;
use rusqlite::Row;

impl Record for Idea {
    type Id = IdeaId;

    const TABLE: &'static str = "ideas";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "project_id",
        "title",
        "notes",
        "is_pinned",
        "created_at",
        "updated_at",
    ];
    const ORDER_BY: &'static str = "is_pinned DESC, updated_at DESC, created_at ASC";
    const SEARCH_COLUMNS: &'static [&'static str] = &["title", "notes"];

    fn id(&self) -> IdeaId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(self.id),
            text(self.project_id),
            text(&self.title),
            opt_text(self.notes.as_ref()),
            Value::from(self.is_pinned),
            Value::Integer(self.created_at),
            Value::Integer(self.updated_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Idea {
            id: parse_col(row, 0)?,
            project_id: parse_col(row, 1)?,
            title: row.get(2)?,
            notes: row.get(3)?,
            is_pinned: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

impl ProjectScoped for Idea {
    fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

impl IdeaRepository {
    /// Raw ids of a project's ideas; `None` if they could not be read.
    pub(crate) fn ids_for_project(&self, project_id: &ProjectId) -> Option<Vec<String>> {
        self.fetch_ids_where("ids_for_project", "project_id", project_id.to_string())
    }

    /// Ideas carrying `tag_id`, each listed once even when linked twice.
    pub fn fetch_by_tag_id(&self, tag_id: &TagId) -> Vec<Idea> {
        let sql = format!(
            "SELECT {} FROM ideas WHERE id IN (SELECT idea_id FROM idea_tags WHERE tag_id = ?1) \
             ORDER BY {}",
            Idea::COLUMNS.join(", "),
            Idea::ORDER_BY
        );
        self.read_rows("fetch_by_tag_id", &sql, params![tag_id.to_string()])
    }
}
