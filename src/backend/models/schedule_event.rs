use crate::models::common::{DateKey, RecordId, TimestampNs};
use crate::services::records_service::RecordInput;
use crate::storage::collection::Record;
use crate::utils::validation::{not_blank, valid_date_key};
use candid::CandidType;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Highlight color of the selected calendar day.
pub const SELECTED_DAY_COLOR: &str = "#1976D2";

/// Kinds of calendar events, each with a fixed marker color.
#[derive(CandidType, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum EventType {
    #[default]
    Doctor,
    #[serde(rename = "Family Visit")]
    FamilyVisit,
    #[serde(rename = "Guest/Friend")]
    GuestFriend,
    #[serde(rename = "Social Event")]
    SocialEvent,
    Therapy,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::Doctor,
        EventType::FamilyVisit,
        EventType::GuestFriend,
        EventType::SocialEvent,
        EventType::Therapy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EventType::Doctor => "Doctor",
            EventType::FamilyVisit => "Family Visit",
            EventType::GuestFriend => "Guest/Friend",
            EventType::SocialEvent => "Social Event",
            EventType::Therapy => "Therapy",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            EventType::Doctor => "#e74c3c",
            EventType::FamilyVisit => "#3498db",
            EventType::GuestFriend => "#2ecc71",
            EventType::SocialEvent => "#f1c40f",
            EventType::Therapy => "#9b59b6",
        }
    }

    /// Text color that stays readable on this type's marker color.
    pub fn text_color(self) -> &'static str {
        text_color_on(self.color())
    }
}

/// Black on yellow and near-white backgrounds, white otherwise.
pub fn text_color_on(background: &str) -> &'static str {
    match background {
        "#f1c40f" | "#eee" | "#fff" => "#000",
        _ => "#fff",
    }
}

#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    pub id: RecordId,
    pub title: String,
    /// Free-form time of day as typed, e.g. "10:30 AM".
    #[serde(default)]
    pub time: String,
    pub date: DateKey,
    #[serde(default)]
    pub reminder_time: Option<TimestampNs>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub color: String,
}

impl Record for ScheduleEvent {
    const STORE_KEY: &'static str = "schedule_events";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct ScheduleEventInput {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    pub time: String,
    #[validate(custom(function = "valid_date_key"))]
    pub date: DateKey,
    pub reminder_time: Option<TimestampNs>,
    pub event_type: EventType,
}

impl RecordInput for ScheduleEventInput {
    type Record = ScheduleEvent;

    fn into_record(self, id: RecordId, _now: TimestampNs) -> ScheduleEvent {
        ScheduleEvent {
            id,
            title: self.title,
            time: self.time,
            date: self.date,
            reminder_time: self.reminder_time,
            color: self.event_type.color().to_string(),
            event_type: self.event_type,
        }
    }

    fn merge_into(self, existing: &ScheduleEvent) -> ScheduleEvent {
        self.into_record(existing.id.clone(), 0)
    }
}

/// Calendar decoration for one day that carries events.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DateMarker {
    /// One dot per event, in event order.
    pub dots: Vec<String>,
    pub marked: bool,
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_serializes_as_label() {
        for event_type in EventType::ALL {
            let json = serde_json::to_string(&event_type).unwrap();
            assert_eq!(json, format!("\"{}\"", event_type.label()));
        }
    }

    #[test]
    fn yellow_markers_use_black_text() {
        assert_eq!(EventType::SocialEvent.text_color(), "#000");
        assert_eq!(EventType::Doctor.text_color(), "#fff");
        assert_eq!(text_color_on("#eee"), "#000");
    }

    #[test]
    fn event_document_uses_type_field() {
        let event = ScheduleEventInput {
            title: "Cardiology".to_string(),
            time: "9:00 AM".to_string(),
            date: "2024-05-01".to_string(),
            reminder_time: None,
            event_type: EventType::FamilyVisit,
        }
        .into_record("e1".to_string(), 0);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Family Visit");
        assert_eq!(json["color"], "#3498db");
        assert!(json.get("reminderTime").is_some());
    }

    #[test]
    fn input_requires_real_date() {
        let input = ScheduleEventInput {
            title: "Visit".to_string(),
            time: String::new(),
            date: "2024-13-01".to_string(),
            reminder_time: None,
            event_type: EventType::Therapy,
        };
        assert!(input.validate().is_err());
    }
}
