use candid::CandidType;
use serde::{Deserialize, Serialize};

pub type OwnerId = String;    // Scope of a caller's collections (principal text or account user id)
pub type RecordId = String;   // Stable ULID assigned at creation
pub type UserId = String;     // Account identifier issued at sign-up
pub type SessionToken = String;
pub type ReminderId = u64;
pub type DateKey = String;    // ISO calendar day, e.g. "2024-05-01"

pub type TimestampNs = u64; // Nanoseconds since epoch

pub const NANOS_PER_SEC: u64 = 1_000_000_000;
pub const NANOS_PER_DAY: u64 = 24 * 60 * 60 * NANOS_PER_SEC;

/// Mobile platform the device application runs on.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy, Default)]
pub enum Platform {
    #[default]
    Ios,
    Android,
    Web,
}
