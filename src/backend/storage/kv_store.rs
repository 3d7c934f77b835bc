// src/backend/storage/kv_store.rs
use crate::error::CareError;
use crate::storage::memory::{get_kv_store_memory, Memory};
use ic_stable_structures::{Memory as StableMemory, StableBTreeMap};
use std::cell::RefCell;

/// String-keyed document store behind every record collection.
///
/// An absent key reads as `None`; callers treat that as the empty collection.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, CareError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), CareError>;
    fn remove(&mut self, key: &str) -> Result<(), CareError>;
}

/// `KeyValueStore` over a stable BTreeMap of JSON documents.
pub struct StableKvStore<M: StableMemory> {
    documents: StableBTreeMap<String, String, M>,
}

impl<M: StableMemory> StableKvStore<M> {
    pub fn init(memory: M) -> Self {
        StableKvStore {
            documents: StableBTreeMap::init(memory),
        }
    }

    pub fn len(&self) -> u64 {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl<M: StableMemory> KeyValueStore for StableKvStore<M> {
    fn get(&self, key: &str) -> Result<Option<String>, CareError> {
        Ok(self.documents.get(&key.to_string()))
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), CareError> {
        self.documents.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CareError> {
        self.documents.remove(&key.to_string());
        Ok(())
    }
}

thread_local! {
    /// Documents keyed by "{owner}/{store_key}".
    static KV_STORE: RefCell<StableKvStore<Memory>> = RefCell::new(
        StableKvStore::init(get_kv_store_memory())
    );
}

/// Runs `f` with exclusive access to the canister's document store.
pub fn with_kv_store<R>(f: impl FnOnce(&mut StableKvStore<Memory>) -> R) -> R {
    KV_STORE.with(|store| f(&mut store.borrow_mut()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ic_stable_structures::DefaultMemoryImpl;

    #[test]
    fn absent_key_reads_as_none() {
        let store = StableKvStore::init(DefaultMemoryImpl::default());
        assert_eq!(store.get("owner/stored_notes").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn set_overwrites_and_remove_deletes() {
        let mut store = StableKvStore::init(DefaultMemoryImpl::default());
        store.set("a/stored_rx", "[]".to_string()).unwrap();
        store.set("a/stored_rx", "[1]".to_string()).unwrap();
        assert_eq!(store.get("a/stored_rx").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.len(), 1);

        store.remove("a/stored_rx").unwrap();
        assert_eq!(store.get("a/stored_rx").unwrap(), None);
    }

    #[test]
    fn global_store_is_shared_between_calls() {
        with_kv_store(|store| store.set("x/k", "v".to_string())).unwrap();
        let value = with_kv_store(|store| store.get("x/k")).unwrap();
        assert_eq!(value.as_deref(), Some("v"));
    }
}
