use crate::models::common::{RecordId, TimestampNs};
use crate::services::records_service::RecordInput;
use crate::storage::collection::Record;
use crate::utils::validation::not_blank;
use candid::CandidType;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A prescription medication. `rx_number` is the join key into the
/// ambulance selection set.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub strength: String,
    #[serde(default)]
    pub pharmacy: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub rx_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Record for Prescription {
    const STORE_KEY: &'static str = "stored_rx";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct PrescriptionInput {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    pub purpose: String,
    pub frequency: String,
    pub strength: String,
    pub pharmacy: String,
    pub notes: String,
    pub rx_number: String,
    pub image: Option<String>,
}

impl RecordInput for PrescriptionInput {
    type Record = Prescription;

    fn into_record(self, id: RecordId, _now: TimestampNs) -> Prescription {
        Prescription {
            id,
            name: self.name,
            purpose: self.purpose,
            frequency: self.frequency,
            strength: self.strength,
            pharmacy: self.pharmacy,
            notes: self.notes,
            rx_number: self.rx_number,
            image: self.image,
        }
    }

    fn merge_into(self, existing: &Prescription) -> Prescription {
        self.into_record(existing.id.clone(), 0)
    }
}
