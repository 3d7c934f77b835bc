use crate::models::common::TimestampNs;
use crate::utils::validation::not_blank;
use candid::CandidType;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Path of the caregivers' shared room.
pub const DEFAULT_CHAT_PATH: &str = "messages";

#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    /// Position in the chat log, shared across paths.
    pub seq: u64,
    pub path: String,
    pub sender: String,
    pub text: String,
    pub timestamp: TimestampNs,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct ChatPost {
    #[validate(custom(function = "not_blank"))]
    pub path: String,
    #[validate(custom(function = "not_blank"), length(max = 64))]
    pub sender: String,
    #[validate(custom(function = "not_blank"), length(max = 2000))]
    pub text: String,
}

/// Full contents of one chat path at a point in the log.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct ChatSnapshot {
    pub messages: Vec<ChatMessage>,
    /// Log length when the snapshot was taken.
    pub log_len: u64,
}
