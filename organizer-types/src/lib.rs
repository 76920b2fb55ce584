//! Shared types for the project organizer.
//!
//! Every persisted record lives here together with its strongly-typed
//! identifier. The storage crate maps these onto tables; nothing in this
//! crate knows about SQL.

mod entities;
mod enums;
mod ids;
mod money;

pub use entities::{
    ActivityLog, Checklist, ChecklistItem, Document, Expense, ExpenseCategory, Idea, IdeaTagLink,
    Note, Project, Reminder, Tag, WorkLog,
};
pub use enums::{ActivityKind, ParseEnumError, Priority, ProjectStatus};
pub use ids::{
    ActivityLogId, ChecklistId, ChecklistItemId, DocumentId, ExpenseCategoryId, ExpenseId, IdeaId,
    IdeaTagLinkId, NoteId, ParseIdError, ProjectId, ReminderId, TagId, WorkLogId,
};
pub use money::Money;

/// Current time in milliseconds since Unix epoch.
pub fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
