use crate::models::common::{RecordId, TimestampNs};
use crate::services::records_service::RecordInput;
use crate::storage::collection::Record;
use crate::utils::validation::not_blank;
use candid::CandidType;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A stored document reference (discharge papers, appointment notes...).
/// `uri` is whatever the device document picker returned.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub uri: String,
}

impl Record for Document {
    const STORE_KEY: &'static str = "stored_documents";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct DocumentInput {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[validate(custom(function = "not_blank"))]
    pub uri: String,
}

impl RecordInput for DocumentInput {
    type Record = Document;

    fn into_record(self, id: RecordId, _now: TimestampNs) -> Document {
        Document {
            id,
            title: self.title,
            description: self.description,
            uri: self.uri,
        }
    }

    fn merge_into(self, existing: &Document) -> Document {
        self.into_record(existing.id.clone(), 0)
    }
}
