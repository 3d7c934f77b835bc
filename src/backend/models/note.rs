use crate::models::common::{RecordId, TimestampNs};
use crate::services::records_service::RecordInput;
use crate::storage::collection::{Record, SortPolicy};
use crate::utils::validation::not_blank;
use candid::CandidType;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use validator::Validate;

/// A caregiving note.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: RecordId,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: TimestampNs,
}

impl Note {
    /// Case-insensitive match against title or content.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle) || self.content.to_lowercase().contains(&needle)
    }
}

impl Record for Note {
    const STORE_KEY: &'static str = "stored_notes";
    const SORT_POLICY: SortPolicy = SortPolicy::OnLoad;

    fn id(&self) -> &str {
        &self.id
    }

    // Newest first.
    fn compare(a: &Self, b: &Self) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct NoteInput {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub content: String,
    pub image: Option<String>,
}

impl RecordInput for NoteInput {
    type Record = Note;

    fn into_record(self, id: RecordId, now: TimestampNs) -> Note {
        Note {
            id,
            title: self.title,
            content: self.content,
            image: self.image,
            created_at: now,
        }
    }

    fn merge_into(self, existing: &Note) -> Note {
        Note {
            id: existing.id.clone(),
            title: self.title,
            content: self.content,
            image: self.image,
            created_at: existing.created_at,
        }
    }
}
