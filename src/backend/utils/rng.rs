// src/backend/utils/rng.rs
// Secret material (session tokens, salts) comes from a ChaCha20 stream seeded
// with the subnet's `raw_rand`. Record ids stay on the sequence counter.

use crate::error::CareError;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::cell::RefCell;

thread_local! {
    static SECRET_RNG: RefCell<Option<ChaCha20Rng>> = RefCell::new(None);
}

/// Seeds the generator. Replaces any earlier state.
pub fn seed_rng(seed: [u8; 32]) {
    SECRET_RNG.with(|rng| *rng.borrow_mut() = Some(ChaCha20Rng::from_seed(seed)));
}

pub fn is_seeded() -> bool {
    SECRET_RNG.with(|rng| rng.borrow().is_some())
}

/// Fetches 32 bytes from `raw_rand` and seeds the generator.
/// Called from a zero-delay timer after init and post_upgrade.
pub async fn initialize_rng() -> Result<(), CareError> {
    let (bytes,): (Vec<u8>,) = ic_cdk::api::management_canister::main::raw_rand()
        .await
        .map_err(|(code, msg)| {
            CareError::InternalError(format!("Failed to get raw_rand: [{:?}] {}", code, msg))
        })?;
    let seed: [u8; 32] = bytes
        .get(..32)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| CareError::InternalError("raw_rand returned insufficient bytes for seed".to_string()))?;
    seed_rng(seed);
    log_info!("Secret RNG seeded from raw_rand.");
    Ok(())
}

/// `len` fresh random bytes, hex encoded.
///
/// # Errors
///
/// `InternalError` while the generator is still waiting for its seed.
pub fn random_hex(len: usize) -> Result<String, CareError> {
    SECRET_RNG.with(|rng| {
        let mut rng = rng.borrow_mut();
        let rng = rng
            .as_mut()
            .ok_or_else(|| CareError::InternalError("Randomness not ready yet, retry shortly.".to_string()))?;
        let mut buf = vec![0u8; len];
        rng.fill_bytes(&mut buf);
        Ok(hex::encode(buf))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseeded_generator_refuses() {
        assert!(!is_seeded());
        assert!(matches!(random_hex(16), Err(CareError::InternalError(_))));
    }

    #[test]
    fn seeded_generator_never_repeats() {
        seed_rng([3; 32]);
        let a = random_hex(32).unwrap();
        let b = random_hex(32).unwrap();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }
}
