// src/backend/storage/config.rs
use crate::models::common::{Platform, NANOS_PER_SEC};
use crate::models::init::InitArgs;
use crate::storage::memory::{get_memory, Memory};
use crate::storage::storable::Cbor;
use candid::Principal;
use ic_stable_structures::{memory_manager::MemoryId, StableCell};
use std::cell::RefCell;

const ADMIN_PRINCIPAL_MEM_ID: MemoryId = MemoryId::new(25);
const PLATFORM_MEM_ID: MemoryId = MemoryId::new(26);
const SESSION_TTL_MEM_ID: MemoryId = MemoryId::new(27);
const MAINTENANCE_INTERVAL_MEM_ID: MemoryId = MemoryId::new(28);
const MIN_CYCLES_THRESHOLD_MEM_ID: MemoryId = MemoryId::new(29);

const DEFAULT_ADMIN_PRINCIPAL: Principal = Principal::management_canister();
pub const DEFAULT_SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60; // one week
pub const DEFAULT_MAINTENANCE_INTERVAL_SECS: u64 = 60 * 60; // hourly
const DEFAULT_MIN_CYCLES_THRESHOLD: u128 = 10_000_000_000; // 10B cycles

thread_local! {
    static ADMIN_PRINCIPAL: RefCell<StableCell<Cbor<Principal>, Memory>> = RefCell::new(
        StableCell::init(get_memory(ADMIN_PRINCIPAL_MEM_ID), Cbor(DEFAULT_ADMIN_PRINCIPAL))
            .expect("Failed to initialize admin principal stable cell")
    );

    /// Platform whose purchase catalog is offered.
    static PLATFORM: RefCell<StableCell<Cbor<Platform>, Memory>> = RefCell::new(
        StableCell::init(get_memory(PLATFORM_MEM_ID), Cbor(Platform::default()))
            .expect("Failed to initialize platform stable cell")
    );

    static SESSION_TTL_SECS: RefCell<StableCell<u64, Memory>> = RefCell::new(
        StableCell::init(get_memory(SESSION_TTL_MEM_ID), DEFAULT_SESSION_TTL_SECS)
            .expect("Failed to initialize session TTL stable cell")
    );

    static MAINTENANCE_INTERVAL_SECS: RefCell<StableCell<u64, Memory>> = RefCell::new(
        StableCell::init(get_memory(MAINTENANCE_INTERVAL_MEM_ID), DEFAULT_MAINTENANCE_INTERVAL_SECS)
            .expect("Failed to initialize maintenance interval stable cell")
    );

    static MIN_CYCLES_THRESHOLD: RefCell<StableCell<u128, Memory>> = RefCell::new(
        StableCell::init(get_memory(MIN_CYCLES_THRESHOLD_MEM_ID), DEFAULT_MIN_CYCLES_THRESHOLD)
            .expect("Failed to initialize min cycles threshold stable cell")
    );
}

/// Initialize the configuration values from InitArgs.
/// Called during canister initialization and upgrade; omitted optional values
/// fall back to their defaults.
pub fn init_config(args: &InitArgs) -> Result<(), String> {
    let platform = args.platform.unwrap_or_default();
    let session_ttl = args.session_ttl_secs.unwrap_or(DEFAULT_SESSION_TTL_SECS);
    let interval = args
        .maintenance_interval_secs
        .unwrap_or(DEFAULT_MAINTENANCE_INTERVAL_SECS);
    let threshold = args.min_cycles_threshold.unwrap_or(DEFAULT_MIN_CYCLES_THRESHOLD);

    if session_ttl == 0 || interval == 0 {
        return Err("Session TTL and maintenance interval must be positive".to_string());
    }

    ADMIN_PRINCIPAL.with(|cell| {
        cell.borrow_mut()
            .set(Cbor(args.admin_principal))
            .map(|_| ())
            .map_err(|e| format!("Failed to set admin principal: {:?}", e))
    })?;
    PLATFORM.with(|cell| {
        cell.borrow_mut()
            .set(Cbor(platform))
            .map(|_| ())
            .map_err(|e| format!("Failed to set platform: {:?}", e))
    })?;
    SESSION_TTL_SECS.with(|cell| {
        cell.borrow_mut()
            .set(session_ttl)
            .map(|_| ())
            .map_err(|e| format!("Failed to set session TTL: {:?}", e))
    })?;
    MAINTENANCE_INTERVAL_SECS.with(|cell| {
        cell.borrow_mut()
            .set(interval)
            .map(|_| ())
            .map_err(|e| format!("Failed to set maintenance interval: {:?}", e))
    })?;
    MIN_CYCLES_THRESHOLD.with(|cell| {
        cell.borrow_mut()
            .set(threshold)
            .map(|_| ())
            .map_err(|e| format!("Failed to set min cycles threshold: {:?}", e))
    })?;

    log_info!(
        "Configuration initialized: Admin={}, Platform={:?}, SessionTTL={}s, Maintenance={}s, Threshold={}",
        args.admin_principal,
        platform,
        session_ttl,
        interval,
        threshold
    );
    Ok(())
}

pub fn get_admin_principal() -> Principal {
    ADMIN_PRINCIPAL.with(|cell| cell.borrow().get().0)
}

pub fn get_platform() -> Platform {
    PLATFORM.with(|cell| cell.borrow().get().0)
}

/// Session lifetime in nanoseconds.
pub fn get_session_ttl_ns() -> u64 {
    SESSION_TTL_SECS.with(|cell| cell.borrow().get().saturating_mul(NANOS_PER_SEC))
}

pub fn get_maintenance_interval_secs() -> u64 {
    MAINTENANCE_INTERVAL_SECS.with(|cell| *cell.borrow().get())
}

pub fn get_min_cycles_threshold() -> u128 {
    MIN_CYCLES_THRESHOLD.with(|cell| *cell.borrow().get())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> InitArgs {
        InitArgs {
            admin_principal: Principal::from_slice(&[1; 29]),
            platform: Some(Platform::Android),
            session_ttl_secs: Some(60),
            maintenance_interval_secs: None,
            min_cycles_threshold: None,
        }
    }

    #[test]
    fn defaults_apply_before_init() {
        assert_eq!(get_platform(), Platform::Ios);
        assert_eq!(get_session_ttl_ns(), DEFAULT_SESSION_TTL_SECS * NANOS_PER_SEC);
        assert_eq!(get_admin_principal(), Principal::management_canister());
    }

    #[test]
    fn init_config_stores_values_and_fills_defaults() {
        init_config(&args()).unwrap();
        assert_eq!(get_admin_principal(), Principal::from_slice(&[1; 29]));
        assert_eq!(get_platform(), Platform::Android);
        assert_eq!(get_session_ttl_ns(), 60 * NANOS_PER_SEC);
        assert_eq!(get_maintenance_interval_secs(), DEFAULT_MAINTENANCE_INTERVAL_SECS);
        assert_eq!(get_min_cycles_threshold(), DEFAULT_MIN_CYCLES_THRESHOLD);
    }

    #[test]
    fn zero_intervals_are_rejected() {
        let mut bad = args();
        bad.session_ttl_secs = Some(0);
        assert!(init_config(&bad).is_err());
    }
}
