use super::{parse_col, text, IdeaTagLinkRepository, TagRepository};
use crate::repository::{Record, Repository};
use organizer_types::{IdeaId, IdeaTagLink, IdeaTagLinkId, ProjectId, Tag, TagId};
use rusqlite::params;
use rusqlite::types::Value;
use rusqlite::Row;

impl Record for Tag {
    type Id = TagId;

    const TABLE: &'static str = "tags";
    const COLUMNS: &'static [&'static str] = &["id", "name", "color", "created_at", "updated_at"];
    const ORDER_BY: &'static str = "name COLLATE NOCASE ASC, created_at ASC";
    const SEARCH_COLUMNS: &'static [&'static str] = &["name"];

    fn id(&self) -> TagId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(self.id),
            text(&self.name),
            text(&self.color),
            Value::Integer(self.created_at),
            Value::Integer(self.updated_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Tag {
            id: parse_col(row, 0)?,
            name: row.get(1)?,
            color: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

impl TagRepository {
    /// Distinct tags linked to an idea; duplicate links collapse.
    pub fn fetch_by_idea_id(&self, idea_id: &IdeaId) -> Vec<Tag> {
        let sql = format!(
            "SELECT {} FROM tags WHERE id IN (SELECT tag_id FROM idea_tags WHERE idea_id = ?1) \
             ORDER BY {}",
            Tag::COLUMNS.join(", "),
            Tag::ORDER_BY
        );
        self.read_rows("fetch_by_idea_id", &sql, params![idea_id.to_string()])
    }

    /// Case-insensitive exact name lookup.
    pub fn fetch_by_name(&self, name: &str) -> Option<Tag> {
        let sql = format!(
            "SELECT {} FROM tags WHERE fold(name) = fold(?1) ORDER BY {} LIMIT 1",
            Tag::COLUMNS.join(", "),
            Tag::ORDER_BY
        );
        self.read_rows("fetch_by_name", &sql, params![name.trim()])
            .into_iter()
            .next()
    }
}

impl Record for IdeaTagLink {
    type Id = IdeaTagLinkId;

    const TABLE: &'static str = "idea_tags";
    const COLUMNS: &'static [&'static str] = &["id", "idea_id", "tag_id", "created_at"];
    const ORDER_BY: &'static str = "created_at ASC";
    // Links carry no text.
    const SEARCH_COLUMNS: &'static [&'static str] = &[];

    fn id(&self) -> IdeaTagLinkId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(self.id),
            text(self.idea_id),
            text(self.tag_id),
            Value::Integer(self.created_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(IdeaTagLink {
            id: parse_col(row, 0)?,
            idea_id: parse_col(row, 1)?,
            tag_id: parse_col(row, 2)?,
            created_at: row.get(3)?,
        })
    }
}

impl IdeaTagLinkRepository {
    /// Insert a fresh link. Linking the same pair twice stores two rows.
    pub fn link(&self, idea_id: &IdeaId, tag_id: &TagId) -> Option<IdeaTagLink> {
        let link = IdeaTagLink::new(*idea_id, *tag_id);
        self.insert(&link).then_some(link)
    }

    pub fn fetch_by_idea_id(&self, idea_id: &IdeaId) -> Vec<IdeaTagLink> {
        self.fetch_where("fetch_by_idea_id", "idea_id", idea_id.to_string())
    }

    pub fn fetch_by_tag_id(&self, tag_id: &TagId) -> Vec<IdeaTagLink> {
        self.fetch_where("fetch_by_tag_id", "tag_id", tag_id.to_string())
    }

    /// Links of every idea in a project.
    pub fn fetch_by_project_id(&self, project_id: &ProjectId) -> Vec<IdeaTagLink> {
        let sql = format!(
            "SELECT {} FROM idea_tags \
             WHERE idea_id IN (SELECT id FROM ideas WHERE project_id = ?1) \
             ORDER BY {}",
            IdeaTagLink::COLUMNS.join(", "),
            IdeaTagLink::ORDER_BY
        );
        self.read_rows("fetch_by_project_id", &sql, params![project_id.to_string()])
    }

    /// Links of every idea in a project, removed as one set.
    pub fn delete_by_project_id(&self, project_id: &ProjectId) -> bool {
        self.write(
            "delete_by_project_id",
            "DELETE FROM idea_tags \
             WHERE idea_id IN (SELECT id FROM ideas WHERE project_id = ?1)",
            params![project_id.to_string()],
        )
        .is_some()
    }

    pub fn delete_by_idea_id(&self, idea_id: &IdeaId) -> bool {
        self.delete_where("delete_by_idea_id", "idea_id", idea_id.to_string())
    }

    /// Drop every link to a tag, e.g. before the tag itself is deleted.
    pub fn delete_by_tag_id(&self, tag_id: &TagId) -> bool {
        self.delete_where("delete_by_tag_id", "tag_id", tag_id.to_string())
    }
}
