// src/backend/utils/crypto.rs
// Identifier generation and hashing helpers

use crate::error::CareError;
use crate::models::common::{RecordId, TimestampNs};
use crate::storage::sequence::next_sequence;
use crate::utils::rng::random_hex;
use sha2::{Digest, Sha256};
use ulid::Ulid;

/// Generates a stable record identifier.
///
/// The ULID's time part is the creation millisecond and its random part is
/// the canister-wide sequence number, so identifiers are unique and sort by
/// creation time.
pub fn next_record_id(now: TimestampNs) -> Result<RecordId, CareError> {
    let seq = next_sequence()?;
    Ok(Ulid::from_parts(now / 1_000_000, seq as u128).to_string())
}

/// Calculates the SHA256 hash of byte data and returns it as a hex string.
pub fn calculate_sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Fresh random per-account salt.
pub fn generate_salt() -> Result<String, CareError> {
    random_hex(16)
}

/// Salted password hash stored with the account.
pub fn hash_password(password: &str, salt: &str) -> String {
    calculate_sha256_hex(format!("{}:{}", salt, password).as_bytes())
}

/// Opaque bearer token: 32 random bytes, unrelated to the user or the clock.
pub fn generate_session_token() -> Result<String, CareError> {
    random_hex(32)
}
