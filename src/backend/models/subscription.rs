use crate::models::common::{OwnerId, TimestampNs, NANOS_PER_DAY};
use candid::CandidType;
use serde::{Deserialize, Serialize};

pub const PREMIUM_MONTHLY: &str = "premium_monthly";
pub const PREMIUM_YEARLY: &str = "premium_yearly";
pub const FREE_TRIAL_DAYS: u32 = 7;

#[derive(CandidType, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubscriptionPeriod {
    Monthly,
    Yearly,
}

impl SubscriptionPeriod {
    pub fn duration_ns(self) -> u64 {
        match self {
            SubscriptionPeriod::Monthly => 30 * NANOS_PER_DAY,
            SubscriptionPeriod::Yearly => 365 * NANOS_PER_DAY,
        }
    }
}

#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Product {
    pub product_id: String,
    pub title: String,
    pub price_label: String,
    pub period: SubscriptionPeriod,
    pub trial_days: u32,
}

/// Whether the platform store can be reached at all.
#[derive(CandidType, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreStatus {
    Connected,
    Unavailable,
}

/// Outcome reported by the platform store's purchase listener.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Ok,
    UserCancelled,
    Error(String),
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct PurchaseEvent {
    pub outcome: PurchaseOutcome,
    pub product_id: String,
    pub transaction_id: String,
    /// Base64 App Store receipt for server-side verification.
    pub receipt: Option<String>,
    pub acknowledged: bool,
}

/// What the purchase listener did with an event.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum PurchaseResolution {
    Activated(Entitlement),
    AlreadyAcknowledged,
    Cancelled,
    Failed(String),
}

#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PurchaseRecord {
    pub owner: OwnerId,
    pub product_id: String,
    pub transaction_id: String,
    pub acknowledged: bool,
    pub purchased_at: TimestampNs,
}

#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Entitlement {
    pub product_id: String,
    pub active: bool,
    pub expires_at: TimestampNs,
}

#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum RestoreResult {
    Restored(Entitlement),
    NoPurchases,
}

/// A purchase the owner started that the store has not reported back on.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PendingPurchase {
    pub product_id: String,
    pub requested_at: TimestampNs,
}
