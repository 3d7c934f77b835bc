// src/backend/metrics.rs
use crate::models::common::TimestampNs;
use crate::storage::metrics::update_metrics;
use candid::{CandidType, Deserialize};
use serde::Serialize;

#[derive(CandidType, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct CareMetrics {
    pub records_written: u64,
    pub records_removed: u64,
    pub reminders_scheduled: u64,
    pub chat_messages: u64,
    pub sign_ups: u64,
    pub purchases_completed: u64,
    /// Timestamp of the last successful maintenance run.
    pub maintenance_last_run: Option<TimestampNs>,
}

// Metrics are best-effort: a failed update is logged and never fails the call.
fn record(label: &str, update_fn: impl FnOnce(&mut CareMetrics)) {
    if let Err(e) = update_metrics(update_fn) {
        log_warn!("Failed to record {} metric: {}", label, e);
    }
}

pub fn record_write() {
    record("records_written", |m| m.records_written = m.records_written.saturating_add(1));
}

pub fn record_removal() {
    record("records_removed", |m| m.records_removed = m.records_removed.saturating_add(1));
}

pub fn record_reminder_scheduled() {
    record("reminders_scheduled", |m| {
        m.reminders_scheduled = m.reminders_scheduled.saturating_add(1)
    });
}

pub fn record_chat_message() {
    record("chat_messages", |m| m.chat_messages = m.chat_messages.saturating_add(1));
}

pub fn record_sign_up() {
    record("sign_ups", |m| m.sign_ups = m.sign_ups.saturating_add(1));
}

pub fn record_purchase_completed() {
    record("purchases_completed", |m| {
        m.purchases_completed = m.purchases_completed.saturating_add(1)
    });
}

pub fn record_maintenance_run(now: TimestampNs) {
    record("maintenance_last_run", |m| m.maintenance_last_run = Some(now));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::metrics::get_metrics;

    #[test]
    fn counters_accumulate() {
        record_write();
        record_write();
        record_removal();
        record_maintenance_run(99);
        let metrics = get_metrics();
        assert_eq!(metrics.records_written, 2);
        assert_eq!(metrics.records_removed, 1);
        assert_eq!(metrics.maintenance_last_run, Some(99));
    }
}
