// src/backend/storage/collection.rs
use crate::error::CareError;
use crate::models::common::RecordId;
use crate::storage::kv_store::KeyValueStore;
use serde::{de::DeserializeOwned, Serialize};
use std::cmp::Ordering;

/// When a collection is brought into its canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortPolicy {
    /// Records keep the order they were added in.
    Insertion,
    /// Sorted every time the collection is loaded; the stored order is untouched.
    OnLoad,
    /// Sorted before every write, so the stored document is already ordered.
    /// Loads sort as well, which also fixes documents written by older clients.
    OnSave,
}

/// A record shape persisted as one element of a JSON array under `STORE_KEY`.
pub trait Record: Serialize + DeserializeOwned + Clone {
    const STORE_KEY: &'static str;
    const SORT_POLICY: SortPolicy = SortPolicy::Insertion;

    fn id(&self) -> &str;

    fn compare(_a: &Self, _b: &Self) -> Ordering {
        Ordering::Equal
    }
}

/// Physical key of an owner's document.
pub fn scoped_key(owner: &str, store_key: &str) -> String {
    format!("{}/{}", owner, store_key)
}

/// Reads and parses a JSON document. An absent key yields `None`.
///
/// # Errors
///
/// `CareError::CorruptRecord` when the stored text does not parse as `T`.
pub fn read_document<T, S>(store: &S, key: &str) -> Result<Option<T>, CareError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key)? {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| CareError::CorruptRecord {
                key: key.to_string(),
                reason: e.to_string(),
            }),
    }
}

/// Serializes `value` and replaces the whole document under `key`.
pub fn write_document<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), CareError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value)
        .map_err(|e| CareError::SerializationError(format!("{}: {}", key, e)))?;
    store.set(key, raw)
}

/// An owner's collection of one record kind, loaded in memory.
///
/// Every mutation writes the entire sequence back before returning, so the
/// in-memory copy and the stored document never diverge after a success.
pub struct RecordCollection<'a, R: Record, S: KeyValueStore + ?Sized> {
    store: &'a mut S,
    key: String,
    records: Vec<R>,
}

impl<'a, R: Record, S: KeyValueStore + ?Sized> RecordCollection<'a, R, S> {
    /// Loads the owner's collection of `R`.
    pub fn open(store: &'a mut S, owner: &str) -> Result<Self, CareError> {
        Self::open_key(store, scoped_key(owner, R::STORE_KEY))
    }

    /// Loads a collection of `R` stored under an explicit physical key.
    /// Used for documents that share a record shape but not its store key.
    pub fn open_key(store: &'a mut S, key: String) -> Result<Self, CareError> {
        let mut collection = RecordCollection {
            store,
            key,
            records: Vec::new(),
        };
        collection.load()?;
        Ok(collection)
    }

    /// Re-reads the stored document, replacing the in-memory copy.
    pub fn load(&mut self) -> Result<&[R], CareError> {
        let mut records: Vec<R> = read_document(&*self.store, &self.key)?.unwrap_or_default();
        if R::SORT_POLICY != SortPolicy::Insertion {
            records.sort_by(R::compare);
        }
        self.records = records;
        Ok(&self.records)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn into_records(self) -> Vec<R> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Appends a record and writes the collection back.
    pub fn add(&mut self, record: R) -> Result<(), CareError> {
        if self.position(record.id()).is_some() {
            return Err(CareError::InvalidInput(format!(
                "Record {} already exists in {}",
                record.id(),
                self.key
            )));
        }
        let mut next = self.records.clone();
        next.push(record);
        self.commit(next)
    }

    /// Replaces the record with identifier `id`.
    ///
    /// # Errors
    ///
    /// `RecordNotFound` for an unknown id; nothing is written in that case.
    pub fn update(&mut self, id: &str, record: R) -> Result<(), CareError> {
        if record.id() != id {
            return Err(CareError::InvalidInput(format!(
                "Record id {} does not match target {}",
                record.id(),
                id
            )));
        }
        let index = self
            .position(id)
            .ok_or_else(|| CareError::RecordNotFound(format!("{} in {}", id, self.key)))?;
        let mut next = self.records.clone();
        next[index] = record;
        self.commit(next)
    }

    /// Removes the record with identifier `id` and returns it. Later records
    /// shift down by one.
    pub fn remove(&mut self, id: &str) -> Result<R, CareError> {
        let index = self
            .position(id)
            .ok_or_else(|| CareError::RecordNotFound(format!("{} in {}", id, self.key)))?;
        let mut next = self.records.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        Ok(removed)
    }

    /// Replaces the whole collection.
    pub fn replace_all(&mut self, records: Vec<R>) -> Result<(), CareError> {
        self.commit(records)
    }

    // The in-memory copy changes only after the write succeeded.
    fn commit(&mut self, mut next: Vec<R>) -> Result<(), CareError> {
        if R::SORT_POLICY == SortPolicy::OnSave {
            next.sort_by(R::compare);
        }
        write_document(&mut *self.store, &self.key, &next)?;
        self.records = next;
        Ok(())
    }
}
