//! UUID-backed identifiers, one newtype per entity kind.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Returned when a stored identifier is not a valid UUID.
#[derive(Debug, Error)]
#[error("invalid identifier {value:?}: {source}")]
pub struct ParseIdError {
    pub value: String,
    #[source]
    pub source: uuid::Error,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self).map_err(|source| ParseIdError {
                    value: s.to_string(),
                    source,
                })
            }
        }
    };
}

define_id!(
    /// Root aggregate identifier.
    ProjectId
);
define_id!(ChecklistId);
define_id!(ChecklistItemId);
define_id!(IdeaId);
define_id!(TagId);
define_id!(
    /// Identifier of one idea/tag join row. Duplicate (idea, tag) pairs get
    /// distinct link ids.
    IdeaTagLinkId
);
define_id!(ExpenseCategoryId);
define_id!(ExpenseId);
define_id!(NoteId);
define_id!(DocumentId);
define_id!(ReminderId);
define_id!(WorkLogId);
define_id!(ActivityLogId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_parse_roundtrip() {
        let id = ProjectId::new();
        let parsed: ProjectId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = "not-a-uuid".parse::<NoteId>().unwrap_err();
        assert_eq!(err.value, "not-a-uuid");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = TagId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }
}
