//! Persisted records.
//!
//! Parent links (`project_id`, `checklist_id`, ...) are plain ids: the store
//! enforces no foreign keys, so keeping them consistent is up to the
//! repositories and the cascade orchestrator.

use crate::enums::{ActivityKind, Priority, ProjectStatus};
use crate::ids::*;
use crate::money::Money;
use crate::now_millis;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Root aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<Money>,
    pub is_pinned: bool,
    pub sort_order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: ProjectId::new(),
            name: name.into(),
            description: None,
            status: ProjectStatus::Active,
            start_date: None,
            end_date: None,
            budget: None,
            is_pinned: false,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    pub id: ChecklistId,
    pub project_id: ProjectId,
    pub title: String,
    pub is_pinned: bool,
    pub sort_order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Checklist {
    pub fn new(project_id: ProjectId, title: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: ChecklistId::new(),
            project_id,
            title: title.into(),
            is_pinned: false,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: ChecklistItemId,
    pub checklist_id: ChecklistId,
    pub title: String,
    pub notes: Option<String>,
    pub is_completed: bool,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub cost_estimate: Option<Money>,
    pub sort_order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ChecklistItem {
    pub fn new(checklist_id: ChecklistId, title: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: ChecklistItemId::new(),
            checklist_id,
            title: title.into(),
            notes: None,
            is_completed: false,
            priority: Priority::Medium,
            due_date: None,
            cost_estimate: None,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    pub id: IdeaId,
    pub project_id: ProjectId,
    pub title: String,
    pub notes: Option<String>,
    pub is_pinned: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Idea {
    pub fn new(project_id: ProjectId, title: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: IdeaId::new(),
            project_id,
            title: title.into(),
            notes: None,
            is_pinned: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Free-standing label; not scoped to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub color: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Tag {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: TagId::new(),
            name: name.into(),
            color: color.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Join row between an idea and a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaTagLink {
    pub id: IdeaTagLinkId,
    pub idea_id: IdeaId,
    pub tag_id: TagId,
    pub created_at: i64,
}

impl IdeaTagLink {
    pub fn new(idea_id: IdeaId, tag_id: TagId) -> Self {
        Self {
            id: IdeaTagLinkId::new(),
            idea_id,
            tag_id,
            created_at: now_millis(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseCategory {
    pub id: ExpenseCategoryId,
    pub project_id: ProjectId,
    pub name: String,
    pub color: Option<String>,
    pub sort_order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ExpenseCategory {
    pub fn new(project_id: ProjectId, name: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: ExpenseCategoryId::new(),
            project_id,
            name: name.into(),
            color: None,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub project_id: ProjectId,
    pub category_id: Option<ExpenseCategoryId>,
    pub checklist_item_id: Option<ChecklistItemId>,
    pub title: String,
    pub vendor: Option<String>,
    pub notes: Option<String>,
    pub amount: Money,
    pub spent_on: NaiveDate,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Expense {
    pub fn new(
        project_id: ProjectId,
        title: impl Into<String>,
        amount: Money,
        spent_on: NaiveDate,
    ) -> Self {
        let now = now_millis();
        Self {
            id: ExpenseId::new(),
            project_id,
            category_id: None,
            checklist_item_id: None,
            title: title.into(),
            vendor: None,
            notes: None,
            amount,
            spent_on,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub project_id: ProjectId,
    pub title: String,
    pub body: String,
    pub is_pinned: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Note {
    pub fn new(project_id: ProjectId, title: impl Into<String>, body: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: NoteId::new(),
            project_id,
            title: title.into(),
            body: body.into(),
            is_pinned: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Metadata of a file attached to a project. The bytes live in external
/// file storage keyed by `file_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub project_id: ProjectId,
    pub title: String,
    pub file_name: String,
    pub mime_type: Option<String>,
    pub byte_size: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Document {
    pub fn new(
        project_id: ProjectId,
        title: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        let now = now_millis();
        Self {
            id: DocumentId::new(),
            project_id,
            title: title.into(),
            file_name: file_name.into(),
            mime_type: None,
            byte_size: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ReminderId,
    pub project_id: ProjectId,
    pub title: String,
    pub notes: Option<String>,
    /// Millisecond timestamp the reminder fires at.
    pub remind_at: i64,
    pub is_completed: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Reminder {
    pub fn new(project_id: ProjectId, title: impl Into<String>, remind_at: i64) -> Self {
        let now = now_millis();
        Self {
            id: ReminderId::new(),
            project_id,
            title: title.into(),
            notes: None,
            remind_at,
            is_completed: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkLog {
    pub id: WorkLogId,
    pub project_id: ProjectId,
    pub checklist_item_id: Option<ChecklistItemId>,
    pub summary: String,
    pub minutes: i64,
    pub logged_on: NaiveDate,
    pub created_at: i64,
    pub updated_at: i64,
}

impl WorkLog {
    pub fn new(
        project_id: ProjectId,
        summary: impl Into<String>,
        minutes: i64,
        logged_on: NaiveDate,
    ) -> Self {
        let now = now_millis();
        Self {
            id: WorkLogId::new(),
            project_id,
            checklist_item_id: None,
            summary: summary.into(),
            minutes,
            logged_on,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One event in a project's activity feed; the aggregator counts these per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: ActivityLogId,
    pub project_id: ProjectId,
    pub kind: ActivityKind,
    pub detail: Option<String>,
    pub occurred_at: i64,
    pub created_at: i64,
}

impl ActivityLog {
    pub fn new(project_id: ProjectId, kind: ActivityKind, occurred_at: i64) -> Self {
        Self {
            id: ActivityLogId::new(),
            project_id,
            kind,
            detail: None,
            occurred_at,
            created_at: now_millis(),
        }
    }
}
