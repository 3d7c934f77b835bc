// src/backend/storage/accounts.rs
use crate::models::account::{Account, Profile, Session};
use crate::models::common::{SessionToken, TimestampNs, UserId};
use crate::storage::memory::{
    get_accounts_memory, get_email_index_memory, get_profiles_memory, get_sessions_memory, Memory,
};
use crate::storage::storable::Cbor;
use ic_stable_structures::StableBTreeMap;
use std::cell::RefCell;

thread_local! {
    /// Accounts: Key = user_id
    static ACCOUNTS: RefCell<StableBTreeMap<UserId, Cbor<Account>, Memory>> = RefCell::new(
        StableBTreeMap::init(get_accounts_memory())
    );

    /// Email index: Key = normalized email, Value = user_id
    static EMAIL_INDEX: RefCell<StableBTreeMap<String, UserId, Memory>> = RefCell::new(
        StableBTreeMap::init(get_email_index_memory())
    );

    /// Profiles: Key = user_id
    static PROFILES: RefCell<StableBTreeMap<UserId, Cbor<Profile>, Memory>> = RefCell::new(
        StableBTreeMap::init(get_profiles_memory())
    );

    /// Sessions: Key = token
    static SESSIONS: RefCell<StableBTreeMap<SessionToken, Cbor<Session>, Memory>> = RefCell::new(
        StableBTreeMap::init(get_sessions_memory())
    );
}

/// Stores a new account and indexes its (already normalized) email.
pub fn insert_account(account: Account) {
    EMAIL_INDEX.with(|index| {
        index
            .borrow_mut()
            .insert(account.email.clone(), account.user_id.clone())
    });
    ACCOUNTS.with(|accounts| {
        accounts
            .borrow_mut()
            .insert(account.user_id.clone(), Cbor(account))
    });
}

pub fn get_account(user_id: &str) -> Option<Account> {
    ACCOUNTS.with(|accounts| accounts.borrow().get(&user_id.to_string()).map(|c| c.0))
}

pub fn find_user_by_email(normalized_email: &str) -> Option<UserId> {
    EMAIL_INDEX.with(|index| index.borrow().get(&normalized_email.to_string()))
}

/// Moves an account to a new login email, keeping the index consistent.
pub fn change_account_email(user_id: &str, new_email: String) -> Option<Account> {
    let mut account = get_account(user_id)?;
    if account.email == new_email {
        return Some(account);
    }
    EMAIL_INDEX.with(|index| {
        let mut index = index.borrow_mut();
        index.remove(&account.email);
        index.insert(new_email.clone(), user_id.to_string());
    });
    account.email = new_email;
    ACCOUNTS.with(|accounts| {
        accounts
            .borrow_mut()
            .insert(user_id.to_string(), Cbor(account.clone()))
    });
    Some(account)
}

pub fn get_profile(user_id: &str) -> Option<Profile> {
    PROFILES.with(|profiles| profiles.borrow().get(&user_id.to_string()).map(|c| c.0))
}

pub fn put_profile(profile: Profile) {
    PROFILES.with(|profiles| {
        profiles
            .borrow_mut()
            .insert(profile.user_id.clone(), Cbor(profile))
    });
}

pub fn insert_session(session: Session) {
    SESSIONS.with(|sessions| {
        sessions
            .borrow_mut()
            .insert(session.token.clone(), Cbor(session))
    });
}

pub fn get_session(token: &str) -> Option<Session> {
    SESSIONS.with(|sessions| sessions.borrow().get(&token.to_string()).map(|c| c.0))
}

pub fn remove_session(token: &str) -> Option<Session> {
    SESSIONS.with(|sessions| sessions.borrow_mut().remove(&token.to_string()).map(|c| c.0))
}

/// Deletes every session expired at `now`. Returns how many were removed.
pub fn purge_expired_sessions(now: TimestampNs) -> u64 {
    SESSIONS.with(|sessions| {
        let mut sessions = sessions.borrow_mut();
        let expired: Vec<SessionToken> = sessions
            .iter()
            .filter(|(_, session)| session.0.is_expired(now))
            .map(|(token, _)| token)
            .collect();
        for token in &expired {
            sessions.remove(token);
        }
        expired.len() as u64
    })
}

pub fn session_count() -> u64 {
    SESSIONS.with(|sessions| sessions.borrow().len())
}
