// src/backend/services/notification.rs
use crate::error::CareError;
use crate::metrics;
use crate::models::common::{OwnerId, ReminderId, TimestampNs};
use crate::models::reminder::{PendingReminder, ReminderRequest};
use crate::storage::reminders;

/// Schedules a local notification on the owner's device.
pub trait NotificationScheduler {
    fn schedule(&mut self, request: ReminderRequest) -> Result<ReminderId, CareError>;
}

/// Canister-side scheduler: reminders wait in a stable outbox until the
/// owner's device collects them with `take_due_reminders`.
pub struct ReminderOutbox {
    owner: OwnerId,
}

impl ReminderOutbox {
    pub fn for_owner(owner: &str) -> Self {
        ReminderOutbox {
            owner: owner.to_string(),
        }
    }
}

impl NotificationScheduler for ReminderOutbox {
    fn schedule(&mut self, request: ReminderRequest) -> Result<ReminderId, CareError> {
        if request.title.trim().is_empty() {
            return Err(CareError::NotificationError(
                "Reminder title must not be blank".to_string(),
            ));
        }
        let id = reminders::insert_reminder(&self.owner, request)?;
        metrics::record_reminder_scheduled();
        Ok(id)
    }
}

/// Returns every reminder of `owner` whose instant has passed and marks it
/// delivered, so each reminder is handed out once.
pub fn take_due_reminders(owner: &str, now: TimestampNs) -> Vec<PendingReminder> {
    let due = reminders::take_due(owner, now);
    if !due.is_empty() {
        log_info!("Delivering {} reminder(s) to {}", due.len(), owner);
    }
    due
}

pub fn pending_reminders(owner: &str) -> Vec<PendingReminder> {
    reminders::pending_for(owner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(fire_at: TimestampNs) -> ReminderRequest {
        ReminderRequest {
            title: "Upcoming Schedule Event".to_string(),
            body: "Dentist".to_string(),
            fire_at,
        }
    }

    #[test]
    fn due_reminders_are_delivered_once() {
        let mut outbox = ReminderOutbox::for_owner("alice");
        outbox.schedule(request(100)).unwrap();
        outbox.schedule(request(500)).unwrap();

        let due = take_due_reminders("alice", 200);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].request.fire_at, 100);
        assert!(take_due_reminders("alice", 200).is_empty());
        assert_eq!(pending_reminders("alice").len(), 1);
    }

    #[test]
    fn reminders_are_scoped_to_owner() {
        ReminderOutbox::for_owner("alice").schedule(request(1)).unwrap();
        assert!(take_due_reminders("bob", 10).is_empty());
        assert_eq!(take_due_reminders("alice", 10).len(), 1);
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut outbox = ReminderOutbox::for_owner("alice");
        let mut bad = request(1);
        bad.title = " ".to_string();
        assert!(matches!(
            outbox.schedule(bad),
            Err(CareError::NotificationError(_))
        ));
    }
}
