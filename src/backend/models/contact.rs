use crate::models::common::{RecordId, TimestampNs};
use crate::services::records_service::RecordInput;
use crate::storage::collection::{Record, SortPolicy};
use crate::utils::validation::not_blank;
use candid::CandidType;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use validator::Validate;

pub const DEFAULT_GROUP: &str = "Family";

/// Fixed display order of contact groups. Unknown labels sort after these.
const GROUP_RANKS: [(&str, u8); 4] = [
    ("Family", 1),
    ("Friends", 2),
    ("Doctors", 3),
    ("Financial Assistance", 4),
];

pub fn group_rank(group: &str) -> u8 {
    GROUP_RANKS
        .iter()
        .find(|(label, _)| *label == group)
        .map(|(_, rank)| *rank)
        .unwrap_or(u8::MAX)
}

/// Row tint the contact list uses per group.
pub fn group_color(group: &str) -> &'static str {
    match group {
        "Family" => "#DCEEFB",
        "Friends" => "#D3F9D8",
        "Doctors" => "#EADFFD",
        "Financial Assistance" => "#FFF8DC",
        _ => "#F0F0F0",
    }
}

#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: RecordId,
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default = "default_group")]
    pub group: String,
}

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

#[derive(CandidType, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapProvider {
    Apple,
    Google,
}

#[derive(CandidType, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Outbound links for one contact row. Absent fields give no link.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ContactLinks {
    pub call: Option<String>,
    pub email: Option<String>,
    pub directions: Option<String>,
}

impl Contact {
    pub fn call_url(&self) -> Option<String> {
        non_empty(&self.phone).map(|phone| format!("tel:{}", phone))
    }

    pub fn email_url(&self) -> Option<String> {
        non_empty(&self.email).map(|email| format!("mailto:{}", email))
    }

    pub fn directions_url(&self, origin: GeoPoint, provider: MapProvider) -> Option<String> {
        let address = self.address.as_deref().and_then(non_empty)?;
        let destination = urlencoding::encode(address);
        let origin = format!("{},{}", origin.latitude, origin.longitude);
        Some(match provider {
            MapProvider::Apple => format!(
                "http://maps.apple.com/?saddr={}&daddr={}",
                origin, destination
            ),
            MapProvider::Google => format!(
                "https://www.google.com/maps/dir/?api=1&origin={}&destination={}",
                origin, destination
            ),
        })
    }

    pub fn links(&self, origin: Option<GeoPoint>, provider: MapProvider) -> ContactLinks {
        ContactLinks {
            call: self.call_url(),
            email: self.email_url(),
            directions: origin.and_then(|o| self.directions_url(o, provider)),
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

impl Record for Contact {
    const STORE_KEY: &'static str = "stored_contacts";
    const SORT_POLICY: SortPolicy = SortPolicy::OnSave;

    fn id(&self) -> &str {
        &self.id
    }

    fn compare(a: &Self, b: &Self) -> Ordering {
        group_rank(&a.group)
            .cmp(&group_rank(&b.group))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    }
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct ContactInput {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub phone: String,
    #[validate(email)]
    pub email: String,
    pub address: Option<String>,
    pub group: Option<String>,
}

impl RecordInput for ContactInput {
    type Record = Contact;

    fn into_record(self, id: RecordId, _now: TimestampNs) -> Contact {
        Contact {
            id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            address: self.address.filter(|a| !a.trim().is_empty()),
            group: self.group.unwrap_or_else(default_group),
        }
    }

    fn merge_into(self, existing: &Contact) -> Contact {
        self.into_record(existing.id.clone(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str, group: &str) -> Contact {
        Contact {
            id: name.to_string(),
            name: name.to_string(),
            phone: "555-0100".to_string(),
            email: "x@example.com".to_string(),
            address: Some("1 Main St, Springfield".to_string()),
            group: group.to_string(),
        }
    }

    #[test]
    fn unknown_groups_rank_last() {
        assert!(group_rank("Family") < group_rank("Doctors"));
        assert!(group_rank("Financial Assistance") < group_rank("Neighbors"));
    }

    #[test]
    fn links_are_built_from_present_fields() {
        let c = contact("Ann", "Family");
        let origin = GeoPoint { latitude: 40.5, longitude: -73.25 };
        let links = c.links(Some(origin), MapProvider::Google);
        assert_eq!(links.call.as_deref(), Some("tel:555-0100"));
        assert_eq!(links.email.as_deref(), Some("mailto:x@example.com"));
        assert_eq!(
            links.directions.as_deref(),
            Some("https://www.google.com/maps/dir/?api=1&origin=40.5,-73.25&destination=1%20Main%20St%2C%20Springfield")
        );

        let apple = c.directions_url(origin, MapProvider::Apple).unwrap();
        assert!(apple.starts_with("http://maps.apple.com/?saddr=40.5,-73.25&daddr=1%20Main"));
    }

    #[test]
    fn missing_address_gives_no_directions() {
        let mut c = contact("Ann", "Family");
        c.address = None;
        c.phone = " ".to_string();
        let links = c.links(Some(GeoPoint { latitude: 0.0, longitude: 0.0 }), MapProvider::Apple);
        assert_eq!(links.call, None);
        assert_eq!(links.directions, None);
    }
}
