use crate::models::common::{RecordId, SessionToken, TimestampNs, UserId};
use crate::storage::collection::Record;
use crate::utils::validation::not_blank;
use candid::CandidType;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Credentials of a signed-up user. Never leaves the canister.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub user_id: UserId,
    pub email: String,
    pub password_hash: String,
    pub salt: String,
    pub created_at: TimestampNs,
}

#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub token: SessionToken,
    pub user_id: UserId,
    pub created_at: TimestampNs,
    pub expires_at: TimestampNs,
}

impl Session {
    pub fn is_expired(&self, now: TimestampNs) -> bool {
        now >= self.expires_at
    }
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct SignUpRequest {
    #[validate(email(message = "Please enter a valid email."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,
    #[validate(custom(function = "not_blank"))]
    pub first_name: String,
    #[validate(custom(function = "not_blank"))]
    pub last_name: String,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct SignInRequest {
    #[validate(custom(function = "not_blank"))]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct UpdateProfileRequest {
    #[validate(custom(function = "not_blank"))]
    pub first_name: String,
    #[validate(custom(function = "not_blank"))]
    pub last_name: String,
    #[validate(email(message = "Please enter a valid email."))]
    pub email: String,
}

/// A caregiver invited onto the main user's team.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: RecordId,
    pub main_user_id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

impl Record for TeamMember {
    const STORE_KEY: &'static str = "team_members";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct TeamMemberInput {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email."))]
    pub email: String,
    #[validate(url)]
    pub profile_image_url: Option<String>,
}

impl TeamMemberInput {
    pub fn into_member(self, id: RecordId, main_user_id: UserId) -> TeamMember {
        TeamMember {
            id,
            main_user_id,
            name: self.name,
            email: self.email,
            profile_image_url: self.profile_image_url,
        }
    }
}

/// Emails are matched case-insensitively and without surrounding spaces.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_password_is_rejected() {
        let req = SignUpRequest {
            email: "ann@example.com".to_string(),
            password: "1".repeat(MIN_PASSWORD_LEN - 1),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
        };
        assert!(req.validate().is_err());
        let ok = SignUpRequest {
            password: "1".repeat(MIN_PASSWORD_LEN),
            ..req
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn team_member_image_must_be_url() {
        let input = TeamMemberInput {
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            profile_image_url: Some("not a url".to_string()),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn emails_normalize() {
        assert_eq!(normalize_email("  Ann@Example.COM "), "ann@example.com");
    }
}
