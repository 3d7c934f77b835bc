// src/backend/utils/guards.rs
use crate::error::CareError;
use crate::models::common::OwnerId;
use crate::storage::config::{get_admin_principal, get_min_cycles_threshold};
use candid::Principal;
use ic_cdk::api::canister_balance128;

/// Checks if the canister has sufficient cycles.
///
/// # Errors
///
/// Returns `CareError::CycleLow` if the balance is below the configured threshold.
pub fn check_cycles() -> Result<(), CareError> {
    let balance = canister_balance128();
    let threshold = get_min_cycles_threshold();
    if balance < threshold {
        crate::log_warn!(
            "Cycle balance low: {} cycles, threshold: {}",
            balance,
            threshold
        );
        Err(CareError::CycleLow)
    } else {
        Ok(())
    }
}

/// Guard for admin-only endpoints.
pub fn admin_guard() -> Result<(), String> {
    if ic_cdk::caller() == get_admin_principal() {
        Ok(())
    } else {
        Err(CareError::NotAuthorized("Caller is not the admin.".to_string()).to_string())
    }
}

/// Resolves the caller to the owner scope of its record collections.
///
/// # Errors
///
/// Anonymous callers own no collections.
pub fn caller_owner() -> Result<OwnerId, CareError> {
    owner_of(ic_cdk::caller())
}

pub fn owner_of(principal: Principal) -> Result<OwnerId, CareError> {
    if principal == Principal::anonymous() {
        return Err(CareError::NotAuthorized(
            "Anonymous callers cannot store records.".to_string(),
        ));
    }
    Ok(principal.to_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_principal_has_no_owner_scope() {
        assert!(matches!(
            owner_of(Principal::anonymous()),
            Err(CareError::NotAuthorized(_))
        ));
        let owner = owner_of(Principal::from_slice(&[7; 29])).unwrap();
        assert!(!owner.is_empty());
    }
}
