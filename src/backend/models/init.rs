use crate::models::common::Platform;
use candid::{CandidType, Principal};
use serde::Deserialize;

#[derive(CandidType, Deserialize, Debug, Clone)]
pub struct InitArgs {
    pub admin_principal: Principal,
    /// Platform whose in-app purchase catalog is enabled.
    pub platform: Option<Platform>,
    pub session_ttl_secs: Option<u64>,
    pub maintenance_interval_secs: Option<u64>,
    pub min_cycles_threshold: Option<u128>,
}
