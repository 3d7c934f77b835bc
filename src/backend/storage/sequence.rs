// src/backend/storage/sequence.rs
use crate::error::CareError;
use crate::storage::memory::{get_sequence_memory, Memory};
use ic_stable_structures::StableCell;
use std::cell::RefCell;

thread_local! {
    /// Canister-wide monotonically increasing counter used for identifiers and salts.
    static SEQUENCE: RefCell<StableCell<u64, Memory>> = RefCell::new(
        StableCell::init(get_sequence_memory(), 0)
            .expect("Failed to initialize sequence cell")
    );
}

/// Current value of the sequence (the last number handed out).
pub fn current_sequence() -> u64 {
    SEQUENCE.with(|cell| *cell.borrow().get())
}

/// Increments the sequence and returns the new value.
pub fn next_sequence() -> Result<u64, CareError> {
    SEQUENCE.with(|cell| {
        let mut cell = cell.borrow_mut();
        let next = cell.get().saturating_add(1);
        cell.set(next)
            .map_err(|e| CareError::StorageError(format!("Failed to advance sequence: {:?}", e)))?;
        Ok(next)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let start = current_sequence();
        let a = next_sequence().unwrap();
        let b = next_sequence().unwrap();
        assert_eq!(a, start + 1);
        assert_eq!(b, a + 1);
        assert_eq!(current_sequence(), b);
    }
}
