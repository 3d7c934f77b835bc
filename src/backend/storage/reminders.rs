// src/backend/storage/reminders.rs
use crate::error::CareError;
use crate::models::common::{ReminderId, TimestampNs};
use crate::models::reminder::{PendingReminder, ReminderRequest};
use crate::storage::memory::{get_reminder_counter_memory, get_reminders_memory, Memory};
use crate::storage::storable::Cbor;
use ic_stable_structures::{StableBTreeMap, StableCell};
use std::cell::RefCell;

thread_local! {
    /// Reminder outbox: Key = reminder id
    static REMINDERS: RefCell<StableBTreeMap<ReminderId, Cbor<PendingReminder>, Memory>> = RefCell::new(
        StableBTreeMap::init(get_reminders_memory())
    );

    static NEXT_REMINDER_ID: RefCell<StableCell<u64, Memory>> = RefCell::new(
        StableCell::init(get_reminder_counter_memory(), 1)
            .expect("Failed to initialize reminder counter cell")
    );
}

pub fn insert_reminder(owner: &str, request: ReminderRequest) -> Result<ReminderId, CareError> {
    let reminder_id = NEXT_REMINDER_ID.with(|cell| -> Result<ReminderId, CareError> {
        let mut cell = cell.borrow_mut();
        let id = *cell.get();
        cell.set(id.saturating_add(1))
            .map_err(|e| CareError::StorageError(format!("Failed to advance reminder id: {:?}", e)))?;
        Ok(id)
    })?;
    let reminder = PendingReminder {
        reminder_id,
        owner: owner.to_string(),
        request,
        delivered: false,
    };
    REMINDERS.with(|map| map.borrow_mut().insert(reminder_id, Cbor(reminder)));
    Ok(reminder_id)
}

/// Reminders of `owner` that are not yet delivered, in id order.
pub fn pending_for(owner: &str) -> Vec<PendingReminder> {
    REMINDERS.with(|map| {
        map.borrow()
            .iter()
            .map(|(_, entry)| entry.0)
            .filter(|reminder| reminder.owner == owner && !reminder.delivered)
            .collect()
    })
}

/// Marks every due reminder of `owner` delivered and returns them.
pub fn take_due(owner: &str, now: TimestampNs) -> Vec<PendingReminder> {
    REMINDERS.with(|map| {
        let mut map = map.borrow_mut();
        let due: Vec<PendingReminder> = map
            .iter()
            .map(|(_, entry)| entry.0)
            .filter(|reminder| reminder.owner == owner && reminder.is_due(now))
            .collect();
        for reminder in &due {
            let mut delivered = reminder.clone();
            delivered.delivered = true;
            map.insert(reminder.reminder_id, Cbor(delivered));
        }
        due
    })
}

/// Deletes delivered reminders. Returns how many were removed.
pub fn purge_delivered() -> u64 {
    REMINDERS.with(|map| {
        let mut map = map.borrow_mut();
        let delivered: Vec<ReminderId> = map
            .iter()
            .filter(|(_, entry)| entry.0.delivered)
            .map(|(id, _)| id)
            .collect();
        for id in &delivered {
            map.remove(id);
        }
        delivered.len() as u64
    })
}

pub fn reminder_count() -> u64 {
    REMINDERS.with(|map| map.borrow().len())
}

