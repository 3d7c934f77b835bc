// src/backend/services/scheduler.rs
// Periodic maintenance, run by the canister timer

use crate::error::CareError;
use crate::metrics;
use crate::models::common::TimestampNs;
use crate::storage::{accounts, reminders};
use crate::utils::rate_limit;
use candid::CandidType;
use serde::Deserialize;

#[derive(CandidType, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct MaintenanceReport {
    pub expired_sessions: u64,
    pub delivered_reminders: u64,
    pub idle_rate_buckets: u64,
}

/// Performs maintenance tasks for the entire canister.
pub fn perform_maintenance(now: TimestampNs) -> Result<MaintenanceReport, CareError> {
    log_scheduler!("Starting maintenance at {}", now);

    let report = MaintenanceReport {
        expired_sessions: purge_expired_sessions(now),
        delivered_reminders: purge_delivered_reminders(),
        idle_rate_buckets: rate_limit::purge_idle_buckets(now),
    };

    metrics::record_maintenance_run(now);
    log_scheduler!(
        "Maintenance completed: {} session(s), {} reminder(s), {} rate bucket(s) purged",
        report.expired_sessions,
        report.delivered_reminders,
        report.idle_rate_buckets
    );
    Ok(report)
}

pub fn purge_expired_sessions(now: TimestampNs) -> u64 {
    log_scheduler!("Purging expired sessions...");
    accounts::purge_expired_sessions(now)
}

pub fn purge_delivered_reminders() -> u64 {
    log_scheduler!("Purging delivered reminders...");
    reminders::purge_delivered()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::Session;
    use crate::models::common::NANOS_PER_SEC;
    use crate::models::reminder::ReminderRequest;
    use crate::services::notification::{take_due_reminders, NotificationScheduler, ReminderOutbox};
    use crate::storage::metrics::get_metrics;

    #[test]
    fn maintenance_purges_and_records_run() {
        accounts::insert_session(Session {
            token: "old".to_string(),
            user_id: "u".to_string(),
            created_at: 0,
            expires_at: 5,
        });
        let mut outbox = ReminderOutbox::for_owner("alice");
        for fire_at in [1, 1_000] {
            outbox
                .schedule(ReminderRequest {
                    title: "Upcoming Schedule Event".to_string(),
                    body: "Visit".to_string(),
                    fire_at,
                })
                .unwrap();
        }
        take_due_reminders("alice", 10);
        rate_limit::rate_guard(rate_limit::RateScope::ChatPost, "alice", 0).unwrap();

        // Two seconds on, the chat bucket has refilled.
        let now = 2 * NANOS_PER_SEC;
        let report = perform_maintenance(now).unwrap();
        assert_eq!(
            report,
            MaintenanceReport {
                expired_sessions: 1,
                delivered_reminders: 1,
                idle_rate_buckets: 1,
            }
        );
        assert_eq!(reminders::reminder_count(), 1);
        assert_eq!(get_metrics().maintenance_last_run, Some(now));
        assert_eq!(rate_limit::tracked_keys(), 0);
    }
}
