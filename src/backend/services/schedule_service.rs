// src/backend/services/schedule_service.rs
// Calendar view over the schedule events: day filtering, markers and reminders

use crate::error::CareError;
use crate::models::common::{DateKey, ReminderId, TimestampNs, NANOS_PER_SEC};
use crate::models::reminder::ReminderRequest;
use crate::models::schedule_event::{DateMarker, ScheduleEvent, ScheduleEventInput, SELECTED_DAY_COLOR};
use crate::services::notification::NotificationScheduler;
use crate::services::records_service;
use crate::storage::kv_store::KeyValueStore;
use crate::utils::validation::DATE_KEY_FORMAT;
use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;

pub const REMINDER_TITLE: &str = "Upcoming Schedule Event";

/// Events whose date equals `date`, in stored order.
pub fn events_for_date(events: &[ScheduleEvent], date: &str) -> Vec<ScheduleEvent> {
    events.iter().filter(|e| e.date == date).cloned().collect()
}

/// Calendar markers keyed by date. Every date carrying at least one event
/// gets one dot per event; `selected` flags the chosen day when it has events.
pub fn markers_by_date(events: &[ScheduleEvent], selected: Option<&str>) -> BTreeMap<DateKey, DateMarker> {
    let mut markers: BTreeMap<DateKey, DateMarker> = BTreeMap::new();
    for event in events {
        let marker = markers.entry(event.date.clone()).or_insert_with(|| DateMarker {
            marked: true,
            ..DateMarker::default()
        });
        marker.dots.push(event.color.clone());
        if selected == Some(event.date.as_str()) {
            marker.selected = true;
            marker.selected_color = Some(SELECTED_DAY_COLOR.to_string());
        }
    }
    markers
}

/// Combines a calendar day with a picked "HH:MM" clock time, seconds zeroed, UTC.
pub fn reminder_instant(date: &str, time_of_day: &str) -> Result<TimestampNs, CareError> {
    let day = NaiveDate::parse_from_str(date, DATE_KEY_FORMAT)
        .map_err(|e| CareError::InvalidInput(format!("Invalid date {}: {}", date, e)))?;
    let time = NaiveTime::parse_from_str(time_of_day, "%H:%M")
        .map_err(|e| CareError::InvalidInput(format!("Invalid time {}: {}", time_of_day, e)))?;
    let secs = day.and_time(time).and_utc().timestamp();
    u64::try_from(secs)
        .map(|s| s * NANOS_PER_SEC)
        .map_err(|_| CareError::InvalidInput(format!("Reminder before epoch: {} {}", date, time_of_day)))
}

/// Requests the event's reminder, if it has one.
///
/// Fire-and-forget: a scheduling failure is logged and reported as `None`.
pub fn schedule_reminder<N: NotificationScheduler + ?Sized>(
    scheduler: &mut N,
    event: &ScheduleEvent,
) -> Option<ReminderId> {
    let fire_at = event.reminder_time?;
    let request = ReminderRequest {
        title: REMINDER_TITLE.to_string(),
        body: event.title.clone(),
        fire_at,
    };
    match scheduler.schedule(request) {
        Ok(id) => Some(id),
        Err(e) => {
            log_error!("Failed to schedule reminder for event {}: {}", event.id, e);
            None
        }
    }
}

/// Stores a new event, then schedules its reminder.
pub fn add_event<S, N>(
    store: &mut S,
    scheduler: &mut N,
    owner: &str,
    input: ScheduleEventInput,
    now: TimestampNs,
) -> Result<ScheduleEvent, CareError>
where
    S: KeyValueStore + ?Sized,
    N: NotificationScheduler + ?Sized,
{
    let event = records_service::create(store, owner, input, now)?;
    schedule_reminder(scheduler, &event);
    Ok(event)
}

/// Replaces event `id` with the edit. The reminder requested when the event
/// was created stays as it was.
pub fn update_event<S: KeyValueStore + ?Sized>(
    store: &mut S,
    owner: &str,
    id: &str,
    input: ScheduleEventInput,
) -> Result<ScheduleEvent, CareError> {
    records_service::update(store, owner, id, input)
}

pub fn events_on<S: KeyValueStore + ?Sized>(
    store: &mut S,
    owner: &str,
    date: &str,
) -> Result<Vec<ScheduleEvent>, CareError> {
    let events = records_service::list::<ScheduleEvent, S>(store, owner)?;
    Ok(events_for_date(&events, date))
}

pub fn calendar_markers<S: KeyValueStore + ?Sized>(
    store: &mut S,
    owner: &str,
    selected: Option<&str>,
) -> Result<BTreeMap<DateKey, DateMarker>, CareError> {
    let events = records_service::list::<ScheduleEvent, S>(store, owner)?;
    Ok(markers_by_date(&events, selected))
}
