// src/backend/services/emergency_service.rs
use crate::error::CareError;
use crate::metrics;
use crate::models::emergency_info::{EmergencyInfo, EmergencySummary, EMERGENCY_INFO_KEY};
use crate::services::prescriptions_service;
use crate::storage::collection::{read_document, scoped_key, write_document};
use crate::storage::kv_store::KeyValueStore;
use crate::utils::validation::validate_input;

/// The owner's emergency info, if the form was ever saved.
pub fn get_info<S: KeyValueStore + ?Sized>(store: &S, owner: &str) -> Result<Option<EmergencyInfo>, CareError> {
    read_document(store, &scoped_key(owner, EMERGENCY_INFO_KEY))
}

/// Replaces the singleton emergency info.
pub fn save_info<S: KeyValueStore + ?Sized>(
    store: &mut S,
    owner: &str,
    info: EmergencyInfo,
) -> Result<EmergencyInfo, CareError> {
    validate_input(&info)?;
    write_document(store, &scoped_key(owner, EMERGENCY_INFO_KEY), &info)?;
    metrics::record_write();
    log_info!("Saved emergency info for {}", owner);
    Ok(info)
}

/// Everything the emergency screen shows: the info form and the selected medications.
pub fn summary<S: KeyValueStore + ?Sized>(store: &mut S, owner: &str) -> Result<EmergencySummary, CareError> {
    let info = get_info(&*store, owner)?;
    let conditions = info
        .as_ref()
        .map(|i| i.flagged_conditions().into_iter().map(String::from).collect())
        .unwrap_or_default();
    let medications = prescriptions_service::ambulance_medications(store, owner)?;
    Ok(EmergencySummary {
        info,
        conditions,
        medications,
    })
}
