// src/backend/services/records_service.rs
// Generic CRUD over an owner's record collections

use crate::error::CareError;
use crate::metrics;
use crate::models::common::{RecordId, TimestampNs};
use crate::storage::collection::{Record, RecordCollection};
use crate::storage::kv_store::KeyValueStore;
use crate::utils::crypto::next_record_id;
use crate::utils::validation::validate_input;
use validator::Validate;

/// A validated form payload that creates or edits one record kind.
pub trait RecordInput: Validate {
    type Record: Record;

    /// Builds a new record with identifier `id` created at `now`.
    fn into_record(self, id: RecordId, now: TimestampNs) -> Self::Record;

    /// Applies the edit to `existing`, keeping its identity and creation data.
    fn merge_into(self, existing: &Self::Record) -> Self::Record;
}

/// Loads the owner's collection in its canonical order.
pub fn list<R: Record, S: KeyValueStore + ?Sized>(store: &mut S, owner: &str) -> Result<Vec<R>, CareError> {
    Ok(RecordCollection::<R, S>::open(store, owner)?.into_records())
}

pub fn get<R: Record, S: KeyValueStore + ?Sized>(
    store: &mut S,
    owner: &str,
    id: &str,
) -> Result<R, CareError> {
    RecordCollection::<R, S>::open(store, owner)?
        .get(id)
        .cloned()
        .ok_or_else(|| CareError::RecordNotFound(format!("{} in {}", id, R::STORE_KEY)))
}

/// Validates `input` and appends the resulting record.
///
/// # Errors
///
/// `InvalidInput` when validation fails; nothing is written in that case.
pub fn create<I, S>(store: &mut S, owner: &str, input: I, now: TimestampNs) -> Result<I::Record, CareError>
where
    I: RecordInput,
    S: KeyValueStore + ?Sized,
{
    validate_input(&input)?;
    let mut collection = RecordCollection::<I::Record, S>::open(store, owner)?;
    let record = input.into_record(next_record_id(now)?, now);
    collection.add(record.clone())?;
    metrics::record_write();
    log_info!("Added {} to {}", record.id(), collection.key());
    Ok(record)
}

/// Validates `input` and replaces record `id` with the edit.
pub fn update<I, S>(store: &mut S, owner: &str, id: &str, input: I) -> Result<I::Record, CareError>
where
    I: RecordInput,
    S: KeyValueStore + ?Sized,
{
    validate_input(&input)?;
    let mut collection = RecordCollection::<I::Record, S>::open(store, owner)?;
    let existing = collection
        .get(id)
        .ok_or_else(|| CareError::RecordNotFound(format!("{} in {}", id, collection.key())))?;
    let record = input.merge_into(existing);
    collection.update(id, record.clone())?;
    metrics::record_write();
    Ok(record)
}

pub fn delete<R: Record, S: KeyValueStore + ?Sized>(
    store: &mut S,
    owner: &str,
    id: &str,
) -> Result<R, CareError> {
    let mut collection = RecordCollection::<R, S>::open(store, owner)?;
    let removed = collection.remove(id)?;
    metrics::record_removal();
    log_info!("Removed {} from {}", id, collection.key());
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contact::{Contact, ContactInput};
    use crate::models::document::{Document, DocumentInput};
    use crate::models::note::{Note, NoteInput};
    use crate::storage::kv_store::StableKvStore;
    use ic_stable_structures::DefaultMemoryImpl;

    const OWNER: &str = "owner-1";

    fn store() -> StableKvStore<DefaultMemoryImpl> {
        StableKvStore::init(DefaultMemoryImpl::default())
    }

    fn note(title: &str) -> NoteInput {
        NoteInput {
            title: title.to_string(),
            content: format!("{} content", title),
            image: None,
        }
    }

    fn contact(name: &str, group: &str) -> ContactInput {
        ContactInput {
            name: name.to_string(),
            phone: "555-0100".to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            address: None,
            group: Some(group.to_string()),
        }
    }

    #[test]
    fn create_grows_collection_by_one() {
        let mut store = store();
        create(&mut store, OWNER, note("First"), 1_000).unwrap();
        let before = list::<Note, _>(&mut store, OWNER).unwrap().len();
        let created = create(&mut store, OWNER, note("Second"), 2_000).unwrap();
        let after = list::<Note, _>(&mut store, OWNER).unwrap();
        assert_eq!(after.len(), before + 1);
        assert!(after.contains(&created));
    }

    #[test]
    fn notes_load_newest_first() {
        let mut store = store();
        create(&mut store, OWNER, note("Old"), 1_000_000).unwrap();
        create(&mut store, OWNER, note("New"), 3_000_000).unwrap();
        create(&mut store, OWNER, note("Middle"), 2_000_000).unwrap();
        let titles: Vec<String> = list::<Note, _>(&mut store, OWNER)
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["New", "Middle", "Old"]);
    }

    #[test]
    fn contacts_order_by_group_then_name() {
        let mut store = store();
        create(&mut store, OWNER, contact("zed", "Doctors"), 1).unwrap();
        create(&mut store, OWNER, contact("Bob", "Family"), 2).unwrap();
        create(&mut store, OWNER, contact("amy", "Family"), 3).unwrap();
        create(&mut store, OWNER, contact("Carl", "Neighbors"), 4).unwrap();
        create(&mut store, OWNER, contact("Fay", "Friends"), 5).unwrap();
        let names: Vec<String> = list::<Contact, _>(&mut store, OWNER)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["amy", "Bob", "Fay", "zed", "Carl"]);
    }

    #[test]
    fn invalid_input_writes_nothing() {
        let mut store = store();
        let err = create(&mut store, OWNER, note("  "), 1).unwrap_err();
        assert!(matches!(err, CareError::InvalidInput(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn update_keeps_identity_and_creation_time() {
        let mut store = store();
        let created = create(&mut store, OWNER, note("Draft"), 7_000_000).unwrap();
        let updated = update(&mut store, OWNER, &created.id, note("Final")).unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(get::<Note, _>(&mut store, OWNER, &created.id).unwrap().title, "Final");
    }

    #[test]
    fn update_of_unknown_id_is_not_found() {
        let mut store = store();
        let err = update(&mut store, OWNER, "missing", note("X")).unwrap_err();
        assert!(matches!(err, CareError::RecordNotFound(_)));
    }

    #[test]
    fn delete_shifts_later_records() {
        let mut store = store();
        let docs: Vec<Document> = ["a", "b", "c"]
            .iter()
            .map(|t| {
                create(
                    &mut store,
                    OWNER,
                    DocumentInput {
                        title: t.to_string(),
                        description: "scan".to_string(),
                        uri: format!("file:///{}.pdf", t),
                    },
                    1,
                )
                .unwrap()
            })
            .collect();
        delete::<Document, _>(&mut store, OWNER, &docs[0].id).unwrap();
        let left = list::<Document, _>(&mut store, OWNER).unwrap();
        assert_eq!(left.len(), 2);
        assert_eq!(left[0], docs[1]);
        assert_eq!(left[1], docs[2]);
    }
}
