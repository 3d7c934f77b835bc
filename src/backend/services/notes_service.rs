// src/backend/services/notes_service.rs
use crate::error::CareError;
use crate::models::note::Note;
use crate::services::records_service;
use crate::storage::kv_store::KeyValueStore;

/// Notes whose title or content contains `query`, ignoring case, newest first.
/// A blank query returns every note.
pub fn search_notes<S: KeyValueStore + ?Sized>(
    store: &mut S,
    owner: &str,
    query: &str,
) -> Result<Vec<Note>, CareError> {
    let notes = records_service::list::<Note, S>(store, owner)?;
    let query = query.trim();
    if query.is_empty() {
        return Ok(notes);
    }
    Ok(notes.into_iter().filter(|n| n.matches(query)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::note::NoteInput;
    use crate::storage::kv_store::StableKvStore;
    use ic_stable_structures::DefaultMemoryImpl;

    #[test]
    fn search_is_case_insensitive_over_title_and_content() {
        let mut store = StableKvStore::init(DefaultMemoryImpl::default());
        for (title, content, at) in [
            ("Morning meds", "Took all pills", 1_000_000),
            ("Lunch", "Ate soup, skipped PILLS", 2_000_000),
            ("Walk", "Short walk outside", 3_000_000),
        ] {
            records_service::create(
                &mut store,
                "alice",
                NoteInput {
                    title: title.to_string(),
                    content: content.to_string(),
                    image: None,
                },
                at,
            )
            .unwrap();
        }
        let titles: Vec<String> = search_notes(&mut store, "alice", "pills")
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["Lunch", "Morning meds"]);
        assert_eq!(search_notes(&mut store, "alice", "  ").unwrap().len(), 3);
        assert!(search_notes(&mut store, "alice", "doctor").unwrap().is_empty());
    }
}
