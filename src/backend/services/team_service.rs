// src/backend/services/team_service.rs
// Caregivers invited onto a signed-in user's team

use crate::error::CareError;
use crate::metrics;
use crate::models::account::{TeamMember, TeamMemberInput};
use crate::models::common::TimestampNs;
use crate::services::auth_service::authenticate;
use crate::storage::collection::RecordCollection;
use crate::storage::kv_store::KeyValueStore;
use crate::utils::crypto::next_record_id;
use crate::utils::validation::validate_input;

// Rejects `email` when another member (other than `except`) already uses it.
fn ensure_email_free(team: &[TeamMember], email: &str, except: Option<&str>) -> Result<(), CareError> {
    let taken = team
        .iter()
        .filter(|m| Some(m.id.as_str()) != except)
        .any(|m| m.email.trim().eq_ignore_ascii_case(email.trim()));
    if taken {
        return Err(CareError::InvalidInput(format!("{} is already on the team", email)));
    }
    Ok(())
}

// Team lists are scoped by the main user's id rather than the calling principal.

pub fn list_team_members<S: KeyValueStore + ?Sized>(
    store: &mut S,
    token: &str,
    now: TimestampNs,
) -> Result<Vec<TeamMember>, CareError> {
    let user_id = authenticate(token, now)?;
    Ok(RecordCollection::<TeamMember, S>::open(store, &user_id)?.into_records())
}

pub fn add_team_member<S: KeyValueStore + ?Sized>(
    store: &mut S,
    token: &str,
    input: TeamMemberInput,
    now: TimestampNs,
) -> Result<TeamMember, CareError> {
    validate_input(&input)?;
    let user_id = authenticate(token, now)?;
    let mut team = RecordCollection::<TeamMember, S>::open(store, &user_id)?;
    ensure_email_free(team.records(), &input.email, None)?;
    let member = input.into_member(next_record_id(now)?, user_id);
    team.add(member.clone())?;
    metrics::record_write();
    log_info!("Team member {} added for {}", member.id, member.main_user_id);
    Ok(member)
}

pub fn update_team_member<S: KeyValueStore + ?Sized>(
    store: &mut S,
    token: &str,
    id: &str,
    input: TeamMemberInput,
    now: TimestampNs,
) -> Result<TeamMember, CareError> {
    validate_input(&input)?;
    let user_id = authenticate(token, now)?;
    let mut team = RecordCollection::<TeamMember, S>::open(store, &user_id)?;
    ensure_email_free(team.records(), &input.email, Some(id))?;
    let member = input.into_member(id.to_string(), user_id);
    team.update(id, member.clone())?;
    metrics::record_write();
    Ok(member)
}

pub fn remove_team_member<S: KeyValueStore + ?Sized>(
    store: &mut S,
    token: &str,
    id: &str,
    now: TimestampNs,
) -> Result<TeamMember, CareError> {
    let user_id = authenticate(token, now)?;
    let removed = RecordCollection::<TeamMember, S>::open(store, &user_id)?.remove(id)?;
    metrics::record_removal();
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::{SignInRequest, SignUpRequest};
    use crate::services::auth_service::{sign_in, sign_up};
    use crate::storage::kv_store::StableKvStore;
    use ic_stable_structures::DefaultMemoryImpl;

    fn signed_in(email: &str) -> String {
        if !crate::utils::rng::is_seeded() {
            crate::utils::rng::seed_rng([5; 32]);
        }
        sign_up(
            SignUpRequest {
                email: email.to_string(),
                password: "secret1".to_string(),
                first_name: "Main".to_string(),
                last_name: "User".to_string(),
            },
            1,
        )
        .unwrap();
        sign_in(
            SignInRequest {
                email: email.to_string(),
                password: "secret1".to_string(),
            },
            1,
        )
        .unwrap()
        .token
    }

    fn member(name: &str, email: &str) -> TeamMemberInput {
        TeamMemberInput {
            name: name.to_string(),
            email: email.to_string(),
            profile_image_url: None,
        }
    }

    #[test]
    fn team_crud_round() {
        let mut store = StableKvStore::init(DefaultMemoryImpl::default());
        let token = signed_in("main@example.com");

        let sam = add_team_member(&mut store, &token, member("Sam", "sam@example.com"), 2).unwrap();
        add_team_member(&mut store, &token, member("Kim", "kim@example.com"), 3).unwrap();
        assert_eq!(list_team_members(&mut store, &token, 4).unwrap().len(), 2);

        let renamed = update_team_member(&mut store, &token, &sam.id, member("Samuel", "sam@example.com"), 5).unwrap();
        assert_eq!(renamed.id, sam.id);
        assert_eq!(renamed.main_user_id, sam.main_user_id);

        remove_team_member(&mut store, &token, &sam.id, 6).unwrap();
        let left = list_team_members(&mut store, &token, 7).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].name, "Kim");
    }

    #[test]
    fn duplicate_member_email_is_rejected() {
        let mut store = StableKvStore::init(DefaultMemoryImpl::default());
        let token = signed_in("main@example.com");
        add_team_member(&mut store, &token, member("Sam", "sam@example.com"), 2).unwrap();
        assert!(add_team_member(&mut store, &token, member("Sammy", "SAM@example.com"), 3).is_err());
    }

    #[test]
    fn edit_cannot_take_another_members_email() {
        let mut store = StableKvStore::init(DefaultMemoryImpl::default());
        let token = signed_in("main@example.com");
        let sam = add_team_member(&mut store, &token, member("Sam", "sam@example.com"), 2).unwrap();
        let kim = add_team_member(&mut store, &token, member("Kim", "kim@example.com"), 3).unwrap();

        assert!(matches!(
            update_team_member(&mut store, &token, &kim.id, member("Kim", "Sam@example.com"), 4),
            Err(CareError::InvalidInput(_))
        ));
        // Keeping one's own email is fine.
        assert!(update_team_member(&mut store, &token, &sam.id, member("Samuel", "sam@example.com"), 5).is_ok());
        let emails: Vec<String> = list_team_members(&mut store, &token, 6)
            .unwrap()
            .into_iter()
            .map(|m| m.email)
            .collect();
        assert_eq!(emails, vec!["sam@example.com".to_string(), "kim@example.com".to_string()]);
    }

    #[test]
    fn teams_require_a_session() {
        let mut store = StableKvStore::init(DefaultMemoryImpl::default());
        assert!(matches!(
            add_team_member(&mut store, "bogus", member("Sam", "sam@example.com"), 2),
            Err(CareError::AuthError(_))
        ));
    }
}
