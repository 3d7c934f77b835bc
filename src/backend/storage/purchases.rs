// src/backend/storage/purchases.rs
use crate::error::CareError;
use crate::models::subscription::PurchaseRecord;
use crate::storage::memory::{get_purchase_log_data_memory, get_purchase_log_index_memory, Memory};
use crate::storage::storable::Cbor;
use ic_stable_structures::StableLog;
use std::cell::RefCell;

thread_local! {
    /// Purchase Log: append-only log of completed and cancelled purchases.
    static PURCHASE_LOG: RefCell<StableLog<Cbor<PurchaseRecord>, Memory, Memory>> = RefCell::new(
        StableLog::init(get_purchase_log_index_memory(), get_purchase_log_data_memory())
            .expect("Failed to initialize purchase log")
    );
}

pub fn append_purchase(record: PurchaseRecord) -> Result<u64, CareError> {
    PURCHASE_LOG.with(|log| {
        log.borrow_mut()
            .append(&Cbor(record))
            .map_err(|e| CareError::StorageError(format!("Failed to append purchase: {:?}", e)))
    })
}

/// Purchases of `owner`, oldest first.
pub fn purchases_for(owner: &str) -> Vec<PurchaseRecord> {
    PURCHASE_LOG.with(|log| {
        log.borrow()
            .iter()
            .map(|entry| entry.0)
            .filter(|record| record.owner == owner)
            .collect()
    })
}

pub fn find_transaction(owner: &str, transaction_id: &str) -> Option<PurchaseRecord> {
    purchases_for(owner)
        .into_iter()
        .find(|record| record.transaction_id == transaction_id)
}
