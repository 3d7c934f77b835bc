use crate::models::prescription::Prescription;
use candid::CandidType;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Store key of the per-owner emergency info singleton.
pub const EMERGENCY_INFO_KEY: &str = "ambulance_info";
/// Store key of the prescriptions selected for the emergency screen.
pub const AMBULANCE_RX_KEY: &str = "ambulance_rx";

/// Medical information shown to first responders.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct EmergencyInfo {
    #[validate(length(max = 32))]
    pub height: String,
    #[validate(length(max = 32))]
    pub weight: String,
    pub hospital: String,
    pub practice: String,
    pub allergies_to_meds: String,
    pub allergies: String,
    pub dnr: bool,
    pub epilepsy: bool,
    pub blood_thinners: bool,
    pub diabetes: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_front: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_back: Option<String>,
}

impl EmergencyInfo {
    /// Labels of the conditions flagged on the form, in form order.
    pub fn flagged_conditions(&self) -> Vec<&'static str> {
        [
            (self.dnr, "DNR"),
            (self.epilepsy, "Epilepsy"),
            (self.blood_thinners, "Blood Thinners"),
            (self.diabetes, "Diabetes"),
        ]
        .into_iter()
        .filter_map(|(flag, label)| flag.then_some(label))
        .collect()
    }
}

/// The emergency screen: the info form plus the selected medications.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct EmergencySummary {
    pub info: Option<EmergencyInfo>,
    pub conditions: Vec<String>,
    pub medications: Vec<Prescription>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default() {
        let info: EmergencyInfo = serde_json::from_str(r#"{"hospital":"St. Mary","dnr":true}"#).unwrap();
        assert_eq!(info.hospital, "St. Mary");
        assert!(info.dnr);
        assert_eq!(info.insurance_front, None);
        assert_eq!(info.flagged_conditions(), vec!["DNR"]);
    }
}
