use crate::models::common::{OwnerId, ReminderId, TimestampNs};
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// A local notification the device should show at `fire_at`.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ReminderRequest {
    pub title: String,
    pub body: String,
    pub fire_at: TimestampNs,
}

#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PendingReminder {
    pub reminder_id: ReminderId,
    pub owner: OwnerId,
    pub request: ReminderRequest,
    pub delivered: bool,
}

impl PendingReminder {
    pub fn is_due(&self, now: TimestampNs) -> bool {
        !self.delivered && self.request.fire_at <= now
    }
}
