// src/backend/services/auth_service.rs
// Email/password accounts, sessions and profiles

use crate::error::CareError;
use crate::metrics;
use crate::models::account::{
    normalize_email, Account, Profile, Session, SignInRequest, SignUpRequest, UpdateProfileRequest,
};
use crate::models::common::{TimestampNs, UserId};
use crate::storage::{accounts, config};
use crate::utils::crypto::{generate_salt, generate_session_token, hash_password, next_record_id};
use crate::utils::rate_limit::{rate_guard, RateScope};
use crate::utils::validation::validate_input;

/// Creates an account and its profile.
///
/// # Errors
///
/// * `InvalidInput` - a field is missing, the email is malformed or the password is too short.
/// * `AuthError` - the email already has an account.
pub fn sign_up(mut req: SignUpRequest, now: TimestampNs) -> Result<Profile, CareError> {
    req.email = normalize_email(&req.email);
    validate_input(&req)?;
    let email = req.email.clone();
    if accounts::find_user_by_email(&email).is_some() {
        return Err(CareError::AuthError(
            "An account with this email already exists.".to_string(),
        ));
    }

    let user_id: UserId = next_record_id(now)?;
    let salt = generate_salt()?;
    accounts::insert_account(Account {
        user_id: user_id.clone(),
        email: email.clone(),
        password_hash: hash_password(&req.password, &salt),
        salt,
        created_at: now,
    });
    let profile = Profile {
        user_id,
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
        email,
    };
    accounts::put_profile(profile.clone());
    metrics::record_sign_up();
    log_info!("New account {} created", profile.user_id);
    Ok(profile)
}

/// Verifies credentials and opens a session.
pub fn sign_in(mut req: SignInRequest, now: TimestampNs) -> Result<Session, CareError> {
    req.email = normalize_email(&req.email);
    validate_input(&req)?;
    let email = req.email.clone();
    rate_guard(RateScope::SignIn, &email, now)?;

    let account = accounts::find_user_by_email(&email)
        .and_then(|user_id| accounts::get_account(&user_id))
        .filter(|account| account.password_hash == hash_password(&req.password, &account.salt))
        .ok_or_else(|| {
            log_warn!("Failed sign-in attempt for {}", email);
            CareError::AuthError("Invalid email or password.".to_string())
        })?;

    let session = Session {
        token: generate_session_token()?,
        user_id: account.user_id,
        created_at: now,
        expires_at: now.saturating_add(config::get_session_ttl_ns()),
    };
    accounts::insert_session(session.clone());
    Ok(session)
}

/// Resolves a session token to its user.
pub fn authenticate(token: &str, now: TimestampNs) -> Result<UserId, CareError> {
    let session = accounts::get_session(token)
        .ok_or_else(|| CareError::AuthError("Not signed in.".to_string()))?;
    if session.is_expired(now) {
        accounts::remove_session(token);
        return Err(CareError::AuthError("Session expired. Please sign in again.".to_string()));
    }
    Ok(session.user_id)
}

pub fn get_profile(token: &str, now: TimestampNs) -> Result<Profile, CareError> {
    let user_id = authenticate(token, now)?;
    accounts::get_profile(&user_id)
        .ok_or_else(|| CareError::RecordNotFound(format!("profile {}", user_id)))
}

/// Updates the profile; a changed email also becomes the new login.
pub fn update_profile(token: &str, mut req: UpdateProfileRequest, now: TimestampNs) -> Result<Profile, CareError> {
    req.email = normalize_email(&req.email);
    validate_input(&req)?;
    let user_id = authenticate(token, now)?;
    let email = req.email.clone();
    if let Some(owner) = accounts::find_user_by_email(&email) {
        if owner != user_id {
            return Err(CareError::AuthError(
                "An account with this email already exists.".to_string(),
            ));
        }
    }
    accounts::change_account_email(&user_id, email.clone())
        .ok_or_else(|| CareError::RecordNotFound(format!("account {}", user_id)))?;

    let profile = Profile {
        user_id,
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
        email,
    };
    accounts::put_profile(profile.clone());
    Ok(profile)
}

/// Ends the session. Signing out twice is not an error.
pub fn sign_out(token: &str) {
    if let Some(session) = accounts::remove_session(token) {
        log_info!("User {} signed out", session.user_id);
    }
}
